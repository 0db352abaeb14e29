//! Nudge Server
//!
//! HTTP host for next-word suggestions. Trains the model once at startup,
//! then answers `POST /api/messages/autocomplete` from any number of
//! concurrent requests.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::AppError;
pub use routes::{create_router, with_middleware, AutocompleteRequest, AutocompleteResponse};
pub use state::AppState;
