//! Polling pipeline: fetch inspection images, annotate, store on disk.
//!
//! - [`store`] — per-workcenter directory tree with idempotent writes.
//! - [`poller`] — the periodic fetch → annotate → write loop.

pub mod poller;
pub mod store;

pub use poller::PollerConfig;
pub use store::Store;
