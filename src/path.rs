//! Path rewriting for fragment files
//!
//! Fragments live in different directories of the project tree, but the
//! generated document is consumed from the invocation directory. Every
//! filesystem reference a fragment declares is therefore re-expressed
//! relative to the invocation directory.
//!
//! All computations are lexical: nothing here touches the filesystem, so
//! paths that do not exist yet (volume sources, build contexts) resolve the
//! same way as existing ones.

use std::path::{Component, Path, PathBuf};

/// Directories a path is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    invocation_dir: PathBuf,
    home_dir: Option<PathBuf>,
}

impl PathContext {
    /// Create a context for the given invocation directory, using the
    /// current user's home directory for `~` expansion.
    pub fn new(invocation_dir: impl AsRef<Path>) -> Self {
        Self {
            invocation_dir: normalize(invocation_dir.as_ref()),
            home_dir: dirs::home_dir().map(|home| normalize(&home)),
        }
    }

    /// Replace the home directory used for `~` expansion.
    pub fn with_home_dir(mut self, home_dir: Option<PathBuf>) -> Self {
        self.home_dir = home_dir.map(|home| normalize(&home));
        self
    }

    /// The directory every resolved path is relative to.
    pub fn invocation_dir(&self) -> &Path {
        &self.invocation_dir
    }

    /// Expand a leading `~` or `~/` to the home directory.
    ///
    /// Other values, including `~user/...`, are returned as-is.
    pub fn expand_home(&self, value: &str) -> PathBuf {
        if let Some(home) = &self.home_dir {
            if value == "~" {
                return home.clone();
            }
            if let Some(rest) = value.strip_prefix("~/") {
                return home.join(rest);
            }
        }
        PathBuf::from(value)
    }

    /// Turn `path` into a normalized absolute path, resolving relative paths
    /// against `base`.
    pub fn absolutize(&self, path: &str, base: &Path) -> PathBuf {
        normalize(&base.join(self.expand_home(path)))
    }

    /// Rewrite a path declared in a fragment living in `fragment_dir`.
    ///
    /// Absolute values and values not starting with `.` or `~` (image names,
    /// named volumes) are returned unchanged. Everything else is resolved
    /// against `fragment_dir` and re-expressed relative to the invocation
    /// directory, prefixed with `./` unless it already starts with `.`.
    pub fn resolve(&self, value: &str, fragment_dir: &Path) -> String {
        if Path::new(value).is_absolute() {
            return value.to_string();
        }
        if !value.starts_with('.') && !value.starts_with('~') {
            return value.to_string();
        }

        let absolute = self.absolutize(value, fragment_dir);
        let relative = relative_path(&self.invocation_dir, &absolute);
        if relative.is_absolute() {
            return relative.to_string_lossy().into_owned();
        }

        let rendered = relative.to_string_lossy();
        if rendered.is_empty() {
            ".".to_string()
        } else if rendered.starts_with('.') {
            rendered.into_owned()
        } else {
            format!("./{}", rendered)
        }
    }

    /// Render a fragment directory the way services record their origin:
    /// relative to the invocation directory, or `.` when identical.
    pub fn display_dir(&self, dir: &Path) -> String {
        let relative = relative_path(&self.invocation_dir, &normalize(dir));
        if relative.as_os_str().is_empty() {
            ".".to_string()
        } else {
            relative.to_string_lossy().into_owned()
        }
    }
}

/// Lexically normalize a path, removing `.` components and folding `..`
/// into the preceding component.
///
/// Leading `..` components of a relative path are kept; `..` directly under
/// the root is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Compute the path leading from directory `from` to `to`.
///
/// Both paths are expected to be absolute and normalized. An empty path is
/// returned when they are equal; `to` is returned unchanged when the two do
/// not share a root (e.g. different drives).
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return to.iter().collect();
    }

    let mut result = PathBuf::new();
    for _ in common..from.len() {
        result.push("..");
    }
    for component in &to[common..] {
        result.push(component.as_os_str());
    }
    result
}
