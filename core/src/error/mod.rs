#[allow(clippy::module_inception)]
pub mod error;
pub mod input;
pub mod launch;

pub use error::{CliError, DispatchError};
pub use input::YearSetError;
pub use launch::{LaunchError, ProfileError};
