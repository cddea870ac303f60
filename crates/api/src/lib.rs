//! Inspection gallery HTTP server library.
//!
//! Serves the annotated per-workcenter image tree with an auto-generated
//! directory browser. Exposes the building blocks (config, state, error
//! handling, router) so integration tests and the binary entrypoint can
//! both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
