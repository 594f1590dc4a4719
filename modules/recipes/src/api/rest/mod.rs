pub mod dto;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod problem;
pub mod routes;

pub use identity::{CurrentViewer, IdentityHeader};
pub use routes::{register_routes, RecipesApiDoc};
