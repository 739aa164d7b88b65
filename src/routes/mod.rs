pub mod backups;
pub mod health_checks;

pub use backups::*;
pub use health_checks::*;
