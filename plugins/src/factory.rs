use solvebatch_core::config::LauncherConfig;
use solvebatch_core::error::ProfileError;
use solvebatch_core::launcher::CommandProfile;

use crate::profiles::{AugurProfile, HourlyProfile, ReedsAugurProfile, ReflowProfile};

/// Names accepted by [`build_profile`].
pub const PROFILE_NAMES: &[&str] = &["augur", "reeds_augur", "reflow", "hourly"];

pub fn build_profile(
    name: &str,
    cfg: &LauncherConfig,
) -> Result<Box<dyn CommandProfile>, ProfileError> {
    let profile: Box<dyn CommandProfile> = match name {
        "augur" => Box::new(AugurProfile::new(cfg.python_path.clone())),
        "reeds_augur" => Box::new(ReedsAugurProfile::new(cfg.python_path.clone())),
        "reflow" => Box::new(ReflowProfile::new(cfg.gams_path.clone())),
        // "8760" is what the solver scripts call it
        "hourly" | "8760" => Box::new(HourlyProfile::new(cfg.gams_path.clone())),
        other => return Err(ProfileError::UnknownProfile(other.to_string())),
    };
    tracing::debug!(profile = profile.name(), "command profile selected");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_listed_name_resolves() {
        let cfg = LauncherConfig::default();
        for name in PROFILE_NAMES {
            assert_eq!(build_profile(name, &cfg).unwrap().name(), *name);
        }
        assert_eq!(build_profile("8760", &cfg).unwrap().name(), "hourly");
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = build_profile("lp_solve", &LauncherConfig::default())
            .err()
            .unwrap();
        assert_eq!(err, ProfileError::UnknownProfile("lp_solve".to_string()));
    }

    #[test]
    fn interpreter_paths_come_from_config() {
        use solvebatch_core::task::Task;
        use std::collections::BTreeMap;

        let cfg = LauncherConfig {
            python_path: "/usr/bin/python3".to_string(),
            ..LauncherConfig::default()
        };
        let task = Task::new("ref", 2030).with_args(BTreeMap::from([
            ("timetype".to_string(), "seq".to_string()),
            ("iteration".to_string(), "0".to_string()),
        ]));
        let spec = build_profile("augur", &cfg).unwrap().build(&task).unwrap();
        assert_eq!(spec.program, "/usr/bin/python3");
    }
}
