// Shared components
pub mod config;
pub mod error;
pub mod ids;
pub mod metrics;

// Domain layer (templates and per-guild settings)
pub mod guild;
pub mod template;

// Application layer
pub mod bot;
pub mod gateway;

// Adapters
pub mod api;
pub mod discord;
pub mod server;
