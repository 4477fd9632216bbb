//! notedb - A self-hostable note service with write-back persistence

pub mod cli;
pub mod db;
pub mod http_server;
pub mod observability;
pub mod store;
