// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::model;

// === MODULE WIRING ===
pub mod module;
pub use module::UserSync;

// === INTERNAL MODULES ===
// Exposed for tests and for the server binary's wiring. External consumers
// should stick to `contract` and `UserSync`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
