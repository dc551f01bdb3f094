//! Match Retrieval: obtains the flat (candidate, group) result set for a benchmark role
//! from the external matching engine and keeps it in a short-lived cache.
//!
//! The engine itself (scoring, weighting, aggregation) lives in the database. This module
//! only binds the role id, calls it, and decodes the rows.

pub mod cache;
pub mod retrieval;
pub mod service;

pub use cache::{CachedMatches, MatchCache};
pub use retrieval::{MatchRetrieval, RpcMatchRetrieval, SqlMatchRetrieval};
pub use service::MatchService;
