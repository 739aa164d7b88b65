pub mod backups;
pub mod configuration;
pub mod object_store;
pub mod routes;
pub mod startup;
pub mod telemetry;
