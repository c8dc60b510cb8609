mod load;
mod types;

pub use load::{apply_env_overrides, get_data_dir, load};
pub use types::{
    AppConfig, DispatchConfig, LauncherConfig, LoggingConfig, ReportConfig, StdioKind,
};
