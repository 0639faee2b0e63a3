//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("values.yaml", documents::BASE);
//!     fixture.command().args(["merge", "-f", "values.yaml"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::documents;
    #[allow(unused_imports)]
    pub use super::testdata;
    pub use super::TestFixture;
}

/// Values documents shared by several tests.
#[allow(dead_code)]
pub mod documents {
    /// Baseline chart defaults.
    pub const BASE: &str = r#"
image:
  repository: nginx
  tag: "1.25"
replicas: 1
service:
  type: ClusterIP
  port: 80
"#;

    /// Production overrides for [`BASE`].
    pub const PROD: &str = r#"
replicas: 3
service:
  type: LoadBalancer
"#;

    /// Not a mapping at the top level.
    pub const LIST: &str = "- a\n- b\n";

    /// Broken YAML syntax.
    pub const INVALID_YAML: &str = "image: [unclosed\n";
}

/// Absolute path of a file or directory under `tests/testdata`.
#[allow(dead_code)]
pub fn testdata(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(relative)
}

/// A temporary directory populated with values documents.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_file("values.d/00-base.yaml", documents::BASE)
///     .with_file("prod.yaml", documents::PROD);
///
/// fixture
///     .command()
///     .args(["merge", "-d", "values.d", "-f", "prod.yaml"])
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `values-overlay` command running inside the fixture directory.
    ///
    /// Colors are disabled and the HTTP timeout variable is cleared so the
    /// output does not depend on the caller's environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("values-overlay");
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("VALUES_OVERLAY_HTTP_TIMEOUT");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
