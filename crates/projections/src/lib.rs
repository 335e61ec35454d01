//! Read models and projections for the CQRS query side.
//!
//! This crate provides:
//! - [`Projection`], a read model fed by live events and full-record replays
//! - [`DocumentStore`], version-tracked documents shared by every view
//! - [`ProjectionProcessor`], which bootstraps from the log and then follows the bus
//! - Three views: restaurants (with menus), orders, and stock levels

pub mod document;
pub mod error;
pub mod processor;
pub mod projection;
pub mod views;

pub use document::{Document, DocumentStore};
pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{ApplyOutcome, Projection, ProjectionPhase};
pub use views::{OrderView, RestaurantView, StockLevel, StockView};
