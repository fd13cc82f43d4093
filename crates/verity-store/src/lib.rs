//! Verity Storage Layer
//!
//! Implements the AssessmentStore trait: the append-only ledger of source
//! assessments a verification session folds over.
//!
//! # Backends
//!
//! - [`MemoryStore`]: Vec-backed, the default per-session store
//! - [`SqliteStore`]: SQLite-backed, for sessions whose numeric path must
//!   stay auditable after the process exits
//!
//! Both reject a second record with the same (domain, claim, round) key and
//! never update records in place.
//!
//! # Examples
//!
//! ```
//! use verity_store::SqliteStore;
//! use verity_domain::traits::AssessmentStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! assert_eq!(store.len().unwrap(), 0);
//! ```

#![warn(missing_docs)]

mod error;
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
