//! Storage Module
//!
//! On-disk data files of the log.
//!
//! ## Responsibilities
//! - Append-only writes with monotonic offset bookkeeping ([`LogFile`])
//! - Positioned, lock-shared reads of whole records
//! - Size-limited active file and its one-way retirement to read-only
//!
//! ## Directory Layout
//! ```text
//! {dir}/
//!   ├── 000001.db    (retired, read-only)
//!   ├── 000002.db    (retired, read-only)
//!   └── 000003.db    (active, append)
//! ```
//! File ids start at 1, strictly increase and are never reused or renamed.

use std::path::{Path, PathBuf};

mod data_file;
mod file;

pub use data_file::{ActiveDataFile, RetiredDataFile};
pub use file::{LogFile, OpenMode};

/// Extension of every data file
pub const DATA_FILE_EXT: &str = "db";

/// Path of the data file with the given id: `{dir}/000042.db`
pub fn data_file_path(dir: &Path, file_id: u64) -> PathBuf {
    dir.join(format!("{:06}.{}", file_id, DATA_FILE_EXT))
}

/// Parse a data file id from its path
/// "000042.db" → Some(42)
pub fn parse_file_id(path: &Path) -> Option<u64> {
    if path.extension()? != DATA_FILE_EXT {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}
