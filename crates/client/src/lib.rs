//! REST client for the remote inspection-image API.
//!
//! [`InspectionApi`] wraps the upstream endpoints the pipeline needs:
//! listing inspection workcenters (datasets), listing their most recent
//! files, downloading raw image bytes, and fetching label sets. Every
//! request carries the static `X-Auth-Token` header from [`ApiConfig`].

pub mod api;
pub mod config;

pub use api::{ClientError, FileRef, InspectionApi, Workcenter};
pub use config::ApiConfig;
