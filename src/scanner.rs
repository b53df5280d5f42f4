use crate::error::Result;
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Source scanner for package directories.
///
/// The `FileScanner` recursively walks a resolved package location to find its Rust source
/// files. Hidden entries (names starting with `.`) and `target` directories are skipped. A
/// package resolved to a single `.rs` file yields just that file.
///
/// # Example
///
/// ```no_run
/// use swagger_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./src/controllers"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of a package scan.
pub struct ScanResult {
    /// Discovered `.rs` files, in a stable (sorted) order
    pub rust_files: Vec<PathBuf>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the package and collects every `.rs` file.
    ///
    /// Unreadable entries are logged as warnings and the scan continues past them.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut rust_files = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && file_name != "target"
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => warn!("Failed to access path: {}", e),
            }
        }

        Ok(ScanResult { rust_files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(result: &ScanResult) -> Vec<String> {
        result
            .rust_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_package_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("user.rs"), "pub struct UserController;").unwrap();
        fs::write(root.join("object.rs"), "pub struct ObjectController;").unwrap();
        fs::write(root.join("README.md"), "# controllers").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(names(&result), vec!["object.rs", "user.rs"]);
    }

    #[test]
    fn test_scan_recurses_into_submodules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("admin/reports")).unwrap();
        fs::write(root.join("mod.rs"), "pub mod admin;").unwrap();
        fs::write(root.join("admin/mod.rs"), "pub mod reports;").unwrap();
        fs::write(root.join("admin/reports/daily.rs"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();
        assert_eq!(result.rust_files.len(), 3);
    }

    #[test]
    fn test_scan_skips_hidden_entries_and_target() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join(".cache")).unwrap();
        fs::write(root.join(".cache/stale.rs"), "").unwrap();
        fs::write(root.join(".hidden.rs"), "").unwrap();
        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.rs"), "").unwrap();
        fs::write(root.join("user.rs"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();
        assert_eq!(names(&result), vec!["user.rs"]);
    }

    #[test]
    fn test_scan_single_file_package() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("controllers.rs");
        fs::write(&file, "pub struct UserController;").unwrap();

        let result = FileScanner::new(file.clone()).scan().unwrap();
        assert_eq!(result.rust_files, vec![file]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();
        assert!(result.rust_files.is_empty());
    }
}
