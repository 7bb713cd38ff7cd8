pub mod config;
pub mod error;
pub mod monitor;

pub use config::{Args, MonitorConfig, OutputFormat, Source};
pub use error::{MonitorError, Result};
pub use monitor::{MonitorStats, run};
