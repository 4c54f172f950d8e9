pub mod config;
pub mod error;
pub mod models;
pub mod net;
pub mod repo;
pub mod services;
pub mod sheets;
pub mod state;
pub mod store;

// Convenient re-exports (so call sites can do `craftsheet::Registry`, etc.)
pub use state::registry::Registry;
