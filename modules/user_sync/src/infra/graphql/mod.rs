pub mod client;
pub mod directory;
pub mod operations;

pub use client::{GraphqlClient, Operation, QueryError, ADMIN_SECRET_HEADER};
pub use directory::GraphqlUserDirectory;
