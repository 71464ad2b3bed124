pub mod create;
pub mod delete;
pub mod error;
pub mod ports;
