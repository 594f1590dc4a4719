// === PUBLIC CONTRACT ===
// Other crates consume the module through `contract` only.
pub mod contract;

pub use contract::{client, error, model};

// === INTERNAL MODULES ===
// Exposed for the server binary and for tests; not a stable API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;

pub use config::RecipesConfig;
