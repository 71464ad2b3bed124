pub mod claims;
pub mod directory;
pub mod markers;

pub use claims::ClaimsPort;
pub use directory::UserDirectory;
pub use markers::MarkerStore;
