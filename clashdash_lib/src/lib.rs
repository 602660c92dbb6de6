//! Library layer for ClashDash: roster ingestion, CWL eligibility and
//! visibility rules, and the cached aggregation pipeline.
//!
//! Wraps the `clashdash_api` crate with a spreadsheet roster source, an
//! in-memory TTL cache, and the capacity filter that decides which clans the
//! website surfaces.

pub mod aggregate;
pub mod cache;
pub mod capacity;
pub mod eligibility;
pub mod error;
pub mod model;
pub mod roster;
pub mod session;

pub use clashdash_api;
pub use clashdash_api::types;

pub use aggregate::{Aggregator, EligibilityReport};
pub use cache::MemoryCache;
pub use capacity::filter_visible;
pub use error::AggregationError;
pub use model::MergedClan;
pub use roster::{RosterClient, RosterError, RosterRow};
pub use session::ApiSession;
