//! HTTP handlers for the gallery server.

pub mod browse;
pub mod health;
