//! Vitrine data-access layer.
//!
//! Both binaries talk to their backends through two traits:
//!
//! - [`DocumentStore`]: schemaless JSON documents grouped into collections.
//!   [`PgDocumentStore`] keeps them in a single `PostgreSQL` JSONB table;
//!   [`MemoryDocumentStore`] keeps them in process for tests and local runs.
//! - [`ObjectStorage`]: binary blobs addressed by path, served by URL.
//!   [`HttpObjectStorage`] talks to an HTTP bucket API; [`MemoryObjectStorage`]
//!   keeps blobs in process.
//!
//! On top of those sit typed repositories (one per collection), the catalog
//! listing pipeline and the admin mutation guards.
//!
//! # Migrations
//!
//! The `PostgreSQL` schema lives in `crates/data/migrations/` and is applied by:
//! ```bash
//! cargo run -p vitrine-cli -- migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod document;
pub mod error;
pub mod guards;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod storage;

pub use document::{Collection, Direction, Document, DocumentStore, Filter, OrderBy, Query, SortField};
pub use error::{RepositoryError, StorageError};
pub use memory::MemoryDocumentStore;
pub use postgres::{PgDocumentStore, create_pool};
pub use repositories::{
    ApplicationRepository, CategoryRepository, MediaRepository, ProductRepository,
};
pub use storage::{HttpObjectStorage, MemoryObjectStorage, ObjectStorage};
