#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Metadata table covering every data type and lookup interpretation.
pub const LISTING_METADATA: &str = r#"[
  {"SystemName": "ListingID", "DataType": "Character", "LongName": "Listing ID"},
  {"SystemName": "ListPrice", "DataType": "Decimal"},
  {"SystemName": "Beds", "DataType": "Int"},
  {"SystemName": "Pool", "DataType": "Boolean"},
  {"SystemName": "Status", "DataType": "Int", "Interpretation": "Lookup"},
  {"SystemName": "Features", "DataType": "Character", "Interpretation": "LookupMulti"},
  {"SystemName": "ListDate", "DataType": "Date"},
  {"SystemName": "ShowingTime", "DataType": "Time"},
  {"SystemName": "Modified", "DataType": "DateTime"}
]"#;

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
