//! Ops HTTP server exposing health and metrics endpoints

mod app;
mod state;

pub use app::create_app;
pub use state::AppState;
