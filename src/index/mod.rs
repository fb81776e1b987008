//! Lookup in the DASTCOM index file
//!
//! Every lookup is a fresh linear scan of the file; no in-memory index is
//! built.

mod matcher;
mod query;
mod record;

pub use matcher::{find, Matcher};
pub use query::{classify, Query, NAIF_ID_LOWER, NAIF_ID_UPPER};
pub use record::{split_number_and_name, Record, MAX_ALTERNATE_FIELD};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::AstnameError;
use crate::Result;

/// A `DASTCOM.IDX` file on disk
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    /// Refer to an existing index file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(AstnameError::IndexMissing(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records matching `query`, in file order
    pub fn find(&self, query: &Query) -> Result<Vec<Record>> {
        let file = File::open(&self.path)?;
        find(BufReader::new(file), query)
    }
}
