//! Pagination module
//!
//! Continuation-token driven lazy pagination.
//!
//! # Overview
//!
//! - `PageFetcher` - fetch a list one page at a time, tracking the cursor
//! - `CursorFetcher` - the generic fetcher, parameterized by a page closure
//! - `PagedSequence` - an async stream over all pages with a shared,
//!   append-only cache so repeated enumeration replays instead of refetching
//! - `ContinuationStyle` - the two wire shapes a cursor arrives in: an
//!   explicit token field, or a query parameter inside a `nextLink` URL

mod fetcher;
mod sequence;
mod types;

pub use fetcher::CursorFetcher;
pub use sequence::PagedSequence;
pub use types::{
    extract_single_query_param, ContinuationStyle, Page, PageFetcher, PageRequest,
};
