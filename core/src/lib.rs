pub mod api;
pub mod cancel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod launcher;
pub mod report;
pub mod task;
pub mod util;
pub mod years;
