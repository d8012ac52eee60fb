//! CLI command implementations.

pub mod enrich;
pub mod ingest;
pub mod init_db;
pub mod reset_db;
pub mod status;
pub mod trade;
pub mod validate;
