//! Package lookup on a search path.
//!
//! The indexer never touches the search path directly: it asks a [`PackageResolver`] where a
//! module path lives. [`SearchPathResolver`] is the filesystem implementation; tests can plug
//! in anything that maps names to directories.

use log::debug;
use std::path::{Path, PathBuf};

/// Environment variable holding the default search path, in the platform's path-list format
pub const SEARCH_PATH_ENV: &str = "SWAGGER_SOURCE_PATH";

/// Locates the source of a package given its `::`-separated path.
pub trait PackageResolver {
    /// Returns the package directory (or single module file), or `None` if it does not exist.
    fn resolve(&self, package: &str) -> Option<PathBuf>;
}

/// Resolves packages against a list of source roots.
///
/// For `krate::a::b` every root is tried in order with these candidates:
///
/// 1. `<root>/krate/src/a/b`
/// 2. `<root>/krate/a/b`
/// 3. the same two with a `.rs` suffix
///
/// Paths starting with `crate::` resolve inside the project's own `src` directory. Symlinks
/// are resolved before the location is returned.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    roots: Vec<PathBuf>,
    crate_src: Option<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            crate_src: None,
        }
    }

    /// Sets the directory `crate::` paths resolve against.
    pub fn with_crate_src(mut self, src: PathBuf) -> Self {
        self.crate_src = Some(src);
        self
    }

    fn candidates(&self, segments: &[&str]) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if segments.first() == Some(&"crate") {
            if let Some(src) = &self.crate_src {
                push_module_candidates(&mut candidates, src, &segments[1..]);
            }
            return candidates;
        }

        let Some((krate, rest)) = segments.split_first() else {
            return candidates;
        };
        for root in &self.roots {
            let crate_dir = root.join(krate);
            push_module_candidates(&mut candidates, &crate_dir.join("src"), rest);
            push_module_candidates(&mut candidates, &crate_dir, rest);
        }
        candidates
    }
}

fn push_module_candidates(candidates: &mut Vec<PathBuf>, base: &Path, rest: &[&str]) {
    let dir: PathBuf = rest.iter().fold(base.to_path_buf(), |p, seg| p.join(seg));
    if let Some((last, parents)) = rest.split_last() {
        let parent: PathBuf = parents.iter().fold(base.to_path_buf(), |p, seg| p.join(seg));
        candidates.push(dir);
        candidates.push(parent.join(format!("{}.rs", last)));
    } else {
        candidates.push(dir);
    }
}

impl PackageResolver for SearchPathResolver {
    fn resolve(&self, package: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = package.split("::").filter(|s| !s.is_empty()).collect();
        self.candidates(&segments)
            .into_iter()
            .find(|candidate| candidate.exists())
            .map(|found| {
                let resolved = std::fs::canonicalize(&found).unwrap_or(found);
                debug!("Resolved package {} to {}", package, resolved.display());
                resolved
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_crate_src_layout() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("myapp/src/controllers");
        fs::create_dir_all(&dir).unwrap();

        let resolver = SearchPathResolver::new(vec![temp_dir.path().to_path_buf()]);
        let found = resolver.resolve("myapp::controllers").unwrap();
        assert_eq!(found, fs::canonicalize(&dir).unwrap());
    }

    #[test]
    fn test_resolves_plain_directory_layout() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("shared/handlers/admin");
        fs::create_dir_all(&dir).unwrap();

        let resolver = SearchPathResolver::new(vec![temp_dir.path().to_path_buf()]);
        assert!(resolver.resolve("shared::handlers::admin").is_some());
    }

    #[test]
    fn test_resolves_module_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("myapp/src")).unwrap();
        let file = temp_dir.path().join("myapp/src/controllers.rs");
        fs::write(&file, "").unwrap();

        let resolver = SearchPathResolver::new(vec![temp_dir.path().to_path_buf()]);
        assert_eq!(
            resolver.resolve("myapp::controllers").unwrap(),
            fs::canonicalize(&file).unwrap()
        );
    }

    #[test]
    fn test_first_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::create_dir_all(first.path().join("app/src/controllers")).unwrap();
        fs::create_dir_all(second.path().join("app/src/controllers")).unwrap();

        let resolver = SearchPathResolver::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let found = resolver.resolve("app::controllers").unwrap();
        assert!(found.starts_with(fs::canonicalize(first.path()).unwrap()));
    }

    #[test]
    fn test_crate_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("controllers")).unwrap();

        let resolver = SearchPathResolver::default().with_crate_src(src.clone());
        assert!(resolver.resolve("crate::controllers").is_some());
        assert!(resolver.resolve("crate::missing").is_none());
    }

    #[test]
    fn test_missing_package() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = SearchPathResolver::new(vec![temp_dir.path().to_path_buf()]);
        assert!(resolver.resolve("nowhere::controllers").is_none());
        assert!(resolver.resolve("").is_none());
    }
}
