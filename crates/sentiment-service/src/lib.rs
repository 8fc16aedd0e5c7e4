//! HTTP front end for the review sentiment classifier.

pub mod config;
pub mod error;
pub mod history;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::{AppState, State};
