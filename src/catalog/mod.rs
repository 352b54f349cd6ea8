//! In-memory catalog pipeline: filter, sort, paginate, summarize.

pub mod browser;
pub mod facets;
pub mod filter;
pub mod pagination;
pub mod sort;
pub mod stats;
