//! Web layer for the subway server.
//!
//! Provides JSON endpoints for managing stations and lines, editing line
//! sections and finding priced shortest paths.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
