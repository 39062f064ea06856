//! Content-addressed artifact cache for vidpack
//!
//! This crate provides the caching layer of the pipeline:
//! - a validated [`CacheKey`] type (hex SHA-256, doubles as the archive
//!   filename)
//! - writable cache-root resolution with environment override
//! - a streaming tar+zstd [`archive`] codec for clip and scene bundles
//! - the [`CacheStore`] hit/miss orchestration with scoped temporary
//!   [`workspace`]s
//!
//! Cache entries are immutable once written and are never evicted; they are
//! invalidated only by a change in the key's inputs (content, request,
//! toolchain, mode).

mod error;
pub mod archive;
pub mod key;
pub mod root;
pub mod store;
pub mod workspace;

pub use error::{Error, Result};

pub use archive::ArchiveBundle;
pub use key::CacheKey;
pub use root::resolve_cache_root;
pub use store::CacheStore;
pub use workspace::Workspace;
