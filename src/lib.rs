//! # logcask
//!
//! An embedded, single-process key-value store on the Bitcask design:
//! - Append-only data files with CRC32-checked records
//! - In-memory index from key to the location of its latest record
//! - Size-based rotation of the active data file
//! - Concurrent readers alongside a single writer
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                              │
//! │               put / get / delete / close                     │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!        ┌──────────────┐             ┌──────────────────┐
//!        │    Index     │             │    Data Files    │
//!        │ BTree | Hash │             │ active + retired │
//!        │   (RwLock)   │             └────────┬─────────┘
//!        └──────────────┘                      │
//!                                              ▼
//!                                     ┌──────────────────┐
//!                                     │  Record Codec    │
//!                                     │  (CRC32, LE)     │
//!                                     └──────────────────┘
//! ```
//!
//! The index is not rebuilt from disk when an engine is opened.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod index;
pub mod command;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CaskError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of logcask
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
