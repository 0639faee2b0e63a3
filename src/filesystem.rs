//! Directory listing for values directories
//!
//! The walk order here is part of the merge contract: files found in one
//! values directory are merged in exactly the order this module returns them,
//! so later files override earlier ones. Entries are visited in lexicographic
//! order at every level, and a directory's contents are listed at the point
//! where the directory name sorts.
//!
//! ```text
//! foo/
//! ├── bar/
//! │    └── bar.yaml
//! ├── baz/
//! │    ├── baz.yaml
//! │    └── qux.yaml
//! ├── baz.txt
//! └── foo.yaml
//!
//! list_files_recursive("foo", Some(".yaml"))
//!   => foo/bar/bar.yaml, foo/baz/baz.yaml, foo/baz/qux.yaml, foo/foo.yaml
//! ```

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// List the files under `directory`, recursively and in lexicographic order.
///
/// Only non-directory entries are returned. When `extension` is given and
/// non-empty, only files whose extension (including the leading dot) equals
/// it are returned.
///
/// # Errors
///
/// Returns `Error::Traversal` naming the offending path if the directory does
/// not exist, an entry cannot be read, or a symlink is broken.
pub fn list_files_recursive(directory: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    let extension = extension.filter(|ext| !ext.is_empty());
    let mut files = Vec::new();

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry.map_err(|err| Error::Traversal {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| directory.to_path_buf()),
            source: io::Error::from(err),
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        if file_type.is_symlink() {
            let target = std::fs::metadata(entry.path()).map_err(|err| Error::Traversal {
                path: entry.path().to_path_buf(),
                source: err,
            })?;
            if target.is_dir() {
                debug!("Skipping symlinked directory {}", entry.path().display());
                continue;
            }
        }

        let matches = match extension {
            Some(ext) => file_extension(entry.path()) == Some(ext),
            None => true,
        };
        if matches {
            files.push(entry.into_path());
        }
    }

    debug!(
        "Found {} file(s) under {}",
        files.len(),
        directory.display()
    );
    Ok(files)
}

/// The extension of `path`'s file name, including the leading dot.
///
/// Everything from the last `.` of the final component is the extension, so
/// `values.prod.yaml` has `.yaml` and a file named `.yaml` has `.yaml` too.
pub fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rfind('.').map(|idx| &name[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "key: value\n").unwrap();
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        // Created out of order on purpose.
        touch(temp.path(), "foo/foo.yaml");
        touch(temp.path(), "foo/baz.txt");
        touch(temp.path(), "foo/baz/qux.yaml");
        touch(temp.path(), "foo/bar/bar.yaml");
        touch(temp.path(), "foo/baz/baz.yaml");
        temp
    }

    #[test]
    fn test_lists_yaml_files_in_lexicographic_order() {
        let temp = fixture();
        let files = list_files_recursive(&temp.path().join("foo"), Some(".yaml")).unwrap();
        assert_eq!(
            relative(temp.path(), &files),
            vec![
                "foo/bar/bar.yaml",
                "foo/baz/baz.yaml",
                "foo/baz/qux.yaml",
                "foo/foo.yaml"
            ]
        );
    }

    #[test]
    fn test_empty_extension_lists_every_file() {
        let temp = fixture();
        let files = list_files_recursive(&temp.path().join("foo"), Some("")).unwrap();
        assert_eq!(
            relative(temp.path(), &files),
            vec![
                "foo/bar/bar.yaml",
                "foo/baz/baz.yaml",
                "foo/baz/qux.yaml",
                "foo/baz.txt",
                "foo/foo.yaml"
            ]
        );
        let all = list_files_recursive(&temp.path().join("foo"), None).unwrap();
        assert_eq!(all, files);
    }

    #[test]
    fn test_extension_must_match_exactly() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "d/a.yml");
        touch(temp.path(), "d/b.yaml.bak");
        touch(temp.path(), "d/c.YAML");
        touch(temp.path(), "d/d.yaml");
        let files = list_files_recursive(&temp.path().join("d"), Some(".yaml")).unwrap();
        assert_eq!(relative(temp.path(), &files), vec!["d/d.yaml"]);
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let files = list_files_recursive(temp.path(), Some(".yaml")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_directory_is_traversal_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("non-existing");
        let err = list_files_recursive(&missing, Some(".yaml")).unwrap_err();
        match err {
            Error::Traversal { path, .. } => assert_eq!(path, missing),
            other => panic!("expected traversal error, got {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_traversal_error() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "d/a.yaml");
        std::os::unix::fs::symlink(temp.path().join("gone.yaml"), temp.path().join("d/b.yaml"))
            .unwrap();
        let err = list_files_recursive(&temp.path().join("d"), Some(".yaml")).unwrap_err();
        match err {
            Error::Traversal { path, .. } => assert!(path.ends_with("b.yaml")),
            other => panic!("expected traversal error, got {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_listed() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "real.yaml");
        fs::create_dir_all(temp.path().join("d")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real.yaml"), temp.path().join("d/link.yaml"))
            .unwrap();
        let files = list_files_recursive(&temp.path().join("d"), Some(".yaml")).unwrap();
        assert_eq!(relative(temp.path(), &files), vec!["d/link.yaml"]);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Path::new("a/b.yaml")), Some(".yaml"));
        assert_eq!(file_extension(Path::new("values.prod.yaml")), Some(".yaml"));
        assert_eq!(file_extension(Path::new(".yaml")), Some(".yaml"));
        assert_eq!(file_extension(Path::new("Makefile")), None);
    }
}
