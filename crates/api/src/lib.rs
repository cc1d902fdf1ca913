//! HTTP API: server wiring, authentication gate, route registry, controllers.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
pub mod registry;
