//! Two-ply placement search and its cache key.
//!
//! - [`search_depth2`] / [`Depth2Search`] - score every (current piece, next piece)
//!   placement pair and keep the best N
//! - [`TopN`] - the bounded ranked collection behind it
//! - [`lookup_key`] - canonical string naming a search call, for external memoization
//!
//! Searches are synchronous and hold no shared state; independent calls can run on
//! separate threads.

pub use self::{
    depth2::{Depth2Possibility, Depth2Search, SearchError, SearchStats, search_depth2},
    lookup_key::{KEY_VERSION, LookupKey, lookup_key},
    top_n::TopN,
};

pub mod depth2;
pub mod lookup_key;
pub mod top_n;
