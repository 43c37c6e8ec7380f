//! HTTP API module
//!
//! Public form intake endpoints and the admin review API.

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::ApiServer;
