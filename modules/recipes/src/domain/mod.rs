pub mod error;
pub mod ports;
pub mod projection;
pub mod repo;
pub mod service;
pub mod shopping_list;
pub mod shortlink;
