use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default solvebatch data directory: ~/.solvebatch
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".solvebatch"))
}

/// Load configuration from an explicit path, or from the default search
/// locations, then apply environment overrides.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut cfg = match explicit {
        Some(path) => read_config(path)?,
        None => load_default_file()?,
    };
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

fn load_default_file() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.solvebatch/config.toml
    let home_config = get_data_dir().ok().map(|d| d.join("config.toml"));

    // Priority 2: ./solvebatch.toml (current directory)
    let local_config = Path::new("solvebatch.toml");

    match home_config {
        Some(p) if p.exists() => read_config(&p),
        _ if local_config.exists() => read_config(local_config),
        _ => Ok(AppConfig::default()),
    }
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("cannot parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Environment variables take priority over anything read from disk.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("PYTHON_PATH") {
        cfg.launcher.python_path = v;
    }
    if let Some(v) = non_empty("GAMS_PATH") {
        cfg.launcher.gams_path = v;
    }
    if let Some(v) = non_empty("SOLVEBATCH_PROFILE") {
        cfg.launcher.profile = v;
    }
    if let Some(v) = non_empty("SOLVEBATCH_WORKERS") {
        match v.trim().parse::<usize>() {
            Ok(n) => cfg.dispatch.default_workers = Some(n),
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric SOLVEBATCH_WORKERS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = AppConfig::default();
        let env: HashMap<&str, &str> = [
            ("PYTHON_PATH", "/opt/conda/bin/python"),
            ("SOLVEBATCH_WORKERS", "3"),
            ("GAMS_PATH", "   "),
        ]
        .into_iter()
        .collect();

        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.launcher.python_path, "/opt/conda/bin/python");
        assert_eq!(cfg.dispatch.default_workers, Some(3));
        // blank values are ignored
        assert_eq!(cfg.launcher.gams_path, "gams");
    }

    #[test]
    fn bad_worker_override_is_ignored() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| {
            (k == "SOLVEBATCH_WORKERS").then(|| "many".to_string())
        });
        assert_eq!(cfg.dispatch.default_workers, None);
    }

    #[test]
    fn explicit_path_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[launcher]\nprofile = \"hourly\"").unwrap();

        let cfg = read_config(file.path()).unwrap();
        assert_eq!(cfg.launcher.profile, "hourly");
    }

    #[test]
    fn unparseable_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dispatch\n").unwrap();

        let err = read_config(file.path()).unwrap_err().to_string();
        assert!(err.contains("cannot parse"), "{err}");
    }
}
