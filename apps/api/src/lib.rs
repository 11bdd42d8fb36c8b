//! Bilingual (Arabic/English) CV builder core.
//!
//! `CvStore` holds the CV content and derives two metrics from it, a
//! completion percentage and an ATS compatibility score. `persistence`
//! snapshots the store to a local key-value slot and `routes` exposes it to
//! a front end over JSON.

pub mod config;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod routes;
pub mod scoring;
pub mod state;
pub mod store;

pub use errors::{AppError, PersistenceError};
pub use store::CvStore;
