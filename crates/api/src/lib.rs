//! HTTP API: server wiring, request pipeline, and user endpoints.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
