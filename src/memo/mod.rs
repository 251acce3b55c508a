//! Memoization Module
//!
//! Function memoization over any cache backend: a deterministic signature
//! is derived from a call's arguments and used as the cache key, so
//! repeated calls short-circuit recomputation.

mod signature;
mod wrapper;

// Re-export public types
pub use signature::{build_signature, Args, KeyPolicy, Signature};
pub use wrapper::{AsyncMemo, Memo};
