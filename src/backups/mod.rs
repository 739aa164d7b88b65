pub mod cache;
pub mod classify;
pub mod discovery;
pub mod metrics;
pub mod status;

pub use cache::BackupCache;
pub use classify::{classify, Severity, StatusReport};
pub use status::BackupStatus;
