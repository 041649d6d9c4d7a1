//! # Fragment Loading
//!
//! A fragment is one `docker-compose.auto.yml`-style file. Besides the usual
//! compose sections (`services`, `volumes`, `networks`) it may list further
//! fragments under `includes` and name the stack with `stackName` and
//! `stackVersion`:
//!
//! ```yaml
//! stackName: shop
//! includes:
//!   - ./backend/docker-compose.auto.yml
//! services:
//!   web:
//!     build:
//!       context: ./web
//!     volumes:
//!       - ./data:/data
//!   web:debug:
//!     environment:
//!       - DEBUG=%{DEBUG_LEVEL:1}
//! ```
//!
//! Loading a fragment rewrites every service so that it can be used from the
//! invocation directory:
//!
//! - `context` values go through [`PathContext::resolve`];
//! - `volumes` entries have their host part (before the first `:`) resolved;
//! - every other string, including strings inside sequences, goes through
//!   [`Substituter::substitute`];
//! - nested mappings are processed recursively with the same rules.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};
use crate::path::PathContext;
use crate::substitute::Substituter;

/// Raw content of a fragment file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Mapping,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volumes: Mapping,
    #[serde(default, deserialize_with = "null_as_default")]
    pub networks: Mapping,
    /// Further fragments, relative to this fragment's directory
    #[serde(default, deserialize_with = "present_entries")]
    pub includes: Vec<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub stack_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub stack_version: Option<String>,
}

impl Fragment {
    /// Parse fragment content. An empty document is an empty fragment.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let value: YamlValue = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value)
    }
}

/// A service definition after path rewriting and substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    /// Directory of the declaring fragment, relative to the invocation
    /// directory (`.` when identical)
    pub path: String,
    /// The service's compose keys
    pub config: Mapping,
}

/// A fragment whose services have been rewritten for the invocation directory.
#[derive(Debug, Clone)]
pub struct LoadedFragment {
    /// Absolute, normalized path of the fragment file
    pub file: PathBuf,
    /// Directory containing the fragment file
    pub dir: PathBuf,
    /// Services in declaration order
    pub services: Vec<(String, ServiceDefinition)>,
    pub volumes: Mapping,
    pub networks: Mapping,
    pub includes: Vec<String>,
    pub stack_name: Option<String>,
    pub stack_version: Option<String>,
}

/// Read and rewrite the fragment at `file`, which must be absolute.
pub fn load_fragment(file: &Path, ctx: &PathContext, sub: &Substituter) -> Result<LoadedFragment> {
    let content = fs::read_to_string(file).map_err(|e| Error::FragmentRead {
        path: file.to_path_buf(),
        message: e.to_string(),
    })?;
    let fragment = Fragment::parse(&content).map_err(|e| Error::ConfigParse {
        path: file.to_path_buf(),
        message: e.to_string(),
    })?;

    let dir = file
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::Path {
            message: format!("fragment {} has no parent directory", file.display()),
        })?;
    let origin = ctx.display_dir(&dir);

    let mut services = Vec::with_capacity(fragment.services.len());
    for (key, value) in &fragment.services {
        let name = service_name(key).ok_or_else(|| Error::ConfigParse {
            path: file.to_path_buf(),
            message: format!("service names must be strings, found {:?}", key),
        })?;
        let config = match value {
            YamlValue::Mapping(map) => fix_mapping(map, &dir, ctx, sub),
            YamlValue::Null => Mapping::new(),
            other => {
                return Err(Error::ConfigParse {
                    path: file.to_path_buf(),
                    message: format!(
                        "service '{}' must be a mapping, found {}",
                        name,
                        crate::merge::get_yaml_type_name(other)
                    ),
                })
            }
        };
        services.push((
            name,
            ServiceDefinition {
                path: origin.clone(),
                config,
            },
        ));
    }

    Ok(LoadedFragment {
        file: file.to_path_buf(),
        dir,
        services,
        volumes: fragment.volumes,
        networks: fragment.networks,
        includes: fragment.includes,
        stack_name: fragment.stack_name,
        stack_version: fragment.stack_version,
    })
}

/// Apply path fixups and substitution to every field of a service mapping.
pub fn fix_mapping(
    map: &Mapping,
    fragment_dir: &Path,
    ctx: &PathContext,
    sub: &Substituter,
) -> Mapping {
    map.iter()
        .map(|(key, value)| {
            let fixed = match (key.as_str(), value) {
                (Some("context"), YamlValue::String(path)) => {
                    YamlValue::String(ctx.resolve(path, fragment_dir))
                }
                (Some("volumes"), YamlValue::Sequence(entries)) => YamlValue::Sequence(
                    entries
                        .iter()
                        .map(|entry| match entry {
                            YamlValue::String(volume) => {
                                YamlValue::String(fix_volume(volume, fragment_dir, ctx))
                            }
                            other => fix_value(other, fragment_dir, ctx, sub),
                        })
                        .collect(),
                ),
                _ => fix_value(value, fragment_dir, ctx, sub),
            };
            (key.clone(), fixed)
        })
        .collect()
}

fn fix_value(
    value: &YamlValue,
    fragment_dir: &Path,
    ctx: &PathContext,
    sub: &Substituter,
) -> YamlValue {
    match value {
        YamlValue::String(s) => YamlValue::String(sub.substitute(s)),
        YamlValue::Sequence(items) => YamlValue::Sequence(
            items
                .iter()
                .map(|item| fix_value(item, fragment_dir, ctx, sub))
                .collect(),
        ),
        YamlValue::Mapping(map) => YamlValue::Mapping(fix_mapping(map, fragment_dir, ctx, sub)),
        other => other.clone(),
    }
}

/// Resolve the host part of a short-syntax volume (`host:container[:mode]`).
fn fix_volume(volume: &str, fragment_dir: &Path, ctx: &PathContext) -> String {
    match volume.split_once(':') {
        Some((host, rest)) => format!("{}:{}", ctx.resolve(host, fragment_dir), rest),
        None => ctx.resolve(volume, fragment_dir),
    }
}

fn service_name(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank list entries (`-` with nothing after it, or `""`) are skipped.
fn present_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter(|entry| !entry.trim().is_empty())
        .collect())
}

fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<YamlValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(YamlValue::String(s)) => Some(s),
        Some(YamlValue::Number(n)) => Some(n.to_string()),
        Some(YamlValue::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
