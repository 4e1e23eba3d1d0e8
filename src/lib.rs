pub mod client;
pub mod config;
pub mod error;
pub mod init;
pub mod locator;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod render;
pub mod report;

pub use client::{NotionClient, RemoteStore};
pub use config::Config;
pub use error::{ReportError, ReportResult, TransportError};
pub use report::{Report, generate_report, obtain_report};
