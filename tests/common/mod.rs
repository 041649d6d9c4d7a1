//! Shared test utilities for E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
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
//!     let fixture = TestFixture::new().with_marker(fragments::WEB);
//!     fixture.command().arg("dry").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fragments;
    pub use super::TestFixture;
}

/// Common fragment snippets for testing.
#[allow(dead_code)]
pub mod fragments {
    /// A web service with a debug overlay and a relative build context.
    pub const WEB: &str = r#"
stackName: shop
stackVersion: 1
services:
  web:
    build:
      context: ./web
    volumes:
      - ./data:/data
  web:debug:
    environment:
      - DEBUG=1
"#;

    /// Two services and a named volume.
    pub const WEB_AND_DB: &str = r#"
services:
  web:
    image: nginx
    ports: ["80:80"]
  web:debug:
    environment: [DEBUG=1]
  db:
    image: postgres
    volumes:
      - pgdata:/var/lib/postgresql/data
volumes:
  pgdata: {}
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "services: [web: {";
}

/// A temporary project directory with fragment files.
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

    /// Add a `docker-compose.auto.yml` marker file with the given content.
    pub fn with_marker(self, content: &str) -> Self {
        self.with_file("docker-compose.auto.yml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an executable shell script standing in for docker-compose.
    ///
    /// The script prints its arguments on one line followed by whatever it
    /// received on standard input.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn with_fake_compose(self, path: &str, exit_code: i32) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let script = format!("#!/bin/sh\nprintf '%s ' \"$@\"\necho\ncat\nexit {exit_code}\n");
        let fixture = self.with_file(path, &script);
        let file = fixture.path().join(path);
        let mut permissions = std::fs::metadata(&file)
            .expect("Failed to stat script")
            .permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&file, permissions).expect("Failed to chmod script");
        fixture
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

    /// Create a command configured to run in this fixture's directory.
    ///
    /// Variables that would change the binary's behavior are cleared.
    pub fn command(&self) -> assert_cmd::Command {
        self.command_in("")
    }

    /// Create a command configured to run in a subdirectory of the fixture.
    pub fn command_in(&self, relative: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auto-compose");
        cmd.current_dir(self.path().join(relative))
            .env_remove("AUTO_COMPOSE_PROJECT")
            .env_remove("AUTO_COMPOSE_BIN")
            .env_remove("AUTO_COMPOSE_FILE")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_marker() {
        let fixture = TestFixture::new().with_marker(fragments::WEB);
        assert!(fixture.path().join("docker-compose.auto.yml").exists());
    }

    #[test]
    fn test_fragments_are_valid_yaml() {
        for fragment in [fragments::WEB, fragments::WEB_AND_DB] {
            serde_yaml::from_str::<serde_yaml::Value>(fragment)
                .expect("Fragment should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(fragments::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
