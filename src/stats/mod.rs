//! Per-user expense statistics
//!
//! `StatsService` validates the caller's filter, fetches the matching
//! expenses through the injected database handle and hands them to
//! `StatsAggregator`, which computes totals, a per-category breakdown and a
//! per-month breakdown in one pure, in-process pass over the records.

pub mod aggregator;
pub mod filter;
pub mod service;

use crate::database::DatabaseError;
use thiserror::Error;

pub use aggregator::{
    CategoryBreakdown, MONTHLY_BREAKDOWN_LIMIT, MonthlyBreakdown, StatsAggregator, StatsSummary,
    SummaryTotals,
};
pub use filter::{DateRange, parse_user_id};
pub use service::StatsService;

/// Errors surfaced by statistics computation
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    Persistence(#[from] DatabaseError),
}

pub type StatsResult<T> = Result<T, StatsError>;
