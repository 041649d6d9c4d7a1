//! `%{NAME}` variable substitution
//!
//! Fragment values may reference variables with `%{NAME}` or
//! `%{NAME:fallback}`. Variables come from an explicit [`Variables`]
//! mapping, so the merge engine never reads the process environment itself;
//! the CLI snapshots it once with [`Variables::from_env`].
//!
//! Only the first token of a value is substituted.
//!
//! The fallback is everything after the first `:`, so
//! `%{URL:http://localhost:8080}` falls back to the whole URL instead of
//! stopping at its second colon. A value or fallback that is empty counts as
//! missing, and an unresolved token is left in place.

use std::collections::HashMap;

use regex::Regex;

use crate::error::Result;

/// Variable values available to substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    /// An empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_env() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Set a variable, returning `self` for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Look up a variable. Empty values count as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Resolves substitution tokens against a set of variables.
#[derive(Debug, Clone)]
pub struct Substituter {
    pattern: Regex,
    variables: Variables,
}

impl Substituter {
    pub fn new(variables: Variables) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"%\{[^}]+\}")?,
            variables,
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Substitute the first `%{...}` token found in `value`.
    ///
    /// The variable value is used when set and non-empty, then the fallback
    /// when given and non-empty. Otherwise the token is left in place.
    pub fn substitute(&self, value: &str) -> String {
        let Some(found) = self.pattern.find(value) else {
            return value.to_string();
        };

        let expression = found.as_str();
        let body = &expression[2..expression.len() - 1];
        let (name, fallback) = match body.find(':') {
            Some(position) if position > 0 => (&body[..position], Some(&body[position + 1..])),
            _ => (body, None),
        };

        let replacement = self
            .variables
            .get(name)
            .or_else(|| fallback.filter(|fallback| !fallback.is_empty()));

        match replacement {
            Some(replacement) => format!(
                "{}{}{}",
                &value[..found.start()],
                replacement,
                &value[found.end()..]
            ),
            None => value.to_string(),
        }
    }
}
