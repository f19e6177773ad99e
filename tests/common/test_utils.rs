//! Test utilities for temporary file handling and shared datasets

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two numeric columns and one categorical column with a missing cell.
pub const SCENARIO_CSV: &str = "x,y,label\n1,2,a\n2,4,b\n3,7,a\n4,,c\n";

/// Mixed dataset covering every column kind.
pub const MIXED_CSV: &str = "\
id,price,city,flag,notes
1,10.5,Tokyo,true,
2,11.0,Osaka,false,
3,NA,Tokyo,true,
4,9.25,Kyoto,,
";

/// Writes `bytes` to `name` inside `dir` and returns the full path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// RAII temporary CSV file, removed together with its directory on drop
pub struct TempCsv {
    dir: TempDir,
    path: PathBuf,
}

impl TempCsv {
    /// Create a temporary file holding `bytes`
    pub fn new(bytes: &[u8]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_fixture(dir.path(), "data.csv", bytes);
        TempCsv { dir, path }
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the directory holding the file
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_csv_cleanup() {
        let dir;
        {
            let csv = TempCsv::new(b"a\n1\n");
            dir = csv.dir().to_path_buf();
            assert_eq!(fs::read(csv.path()).unwrap(), b"a\n1\n");
        }
        assert!(!dir.exists(), "Directory should be removed after drop");
    }
}
