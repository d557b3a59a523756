//! Deciding which modules are left untouched
//!
//! Exclusions are configured once as a list of [`ExcludeRule`]s and then
//! consulted per module id. A module is excluded when any rule matches.
//!
//! ```rust
//! use vco_exclude::{ExcludeRule, Excludes};
//!
//! let mut excludes = Excludes::new();
//! excludes.push(ExcludeRule::glob("**/node_modules/**")?);
//! excludes.push(ExcludeRule::regex(r"\.spec\.ts$")?);
//!
//! assert!(excludes.is_excluded("", r"C:\app\node_modules\lib\index.js"));
//! assert!(excludes.is_excluded("", "/src/App.spec.ts"));
//! assert!(!excludes.is_excluded("", "/src/App.vue"));
//! # Ok::<(), vco_exclude::ExcludeError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use regex::Regex;
use thiserror::Error;

/// Glob matching treats `/` as a separator and hides dotfiles from
/// wildcards, so `*` never crosses directories.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Debug, Error)]
pub enum ExcludeError {
    #[error("Invalid exclude glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid exclude regex '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A caller-supplied exclusion test over `(code, id)`
pub type Predicate = dyn Fn(&str, &str) -> anyhow::Result<bool> + Send + Sync;

/// One way of recognising an excluded module
#[derive(Clone)]
pub enum ExcludeRule {
    /// A glob over the normalised id
    Glob(Pattern),
    /// A regex searched for anywhere in the normalised id
    Regex(Regex),
    /// A function of the module source and id. An error counts as "not
    /// excluded".
    Predicate(Arc<Predicate>),
}

impl ExcludeRule {
    pub fn glob(pattern: &str) -> Result<Self, ExcludeError> {
        Pattern::new(pattern)
            .map(ExcludeRule::Glob)
            .map_err(|source| ExcludeError::Glob {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn regex(pattern: &str) -> Result<Self, ExcludeError> {
        Regex::new(pattern)
            .map(ExcludeRule::Regex)
            .map_err(|source| ExcludeError::Regex {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str, &str) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        ExcludeRule::Predicate(Arc::new(predicate))
    }

    /// `id` must already be normalised
    fn matches(&self, code: &str, id: &str) -> bool {
        match self {
            ExcludeRule::Glob(pattern) => pattern.matches_with(id, GLOB_OPTIONS),
            ExcludeRule::Regex(regex) => regex.is_match(id),
            ExcludeRule::Predicate(predicate) => match predicate(code, id) {
                Ok(excluded) => excluded,
                Err(e) => {
                    tracing::warn!(id, error = %e, "exclude predicate failed, not excluding");
                    false
                }
            },
        }
    }
}

impl fmt::Debug for ExcludeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludeRule::Glob(pattern) => f.debug_tuple("Glob").field(&pattern.as_str()).finish(),
            ExcludeRule::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            ExcludeRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Turn Windows separators into `/`
pub fn normalize_id(id: &str) -> String {
    id.replace('\\', "/")
}

/// An ordered set of exclusion rules
#[derive(Debug, Clone, Default)]
pub struct Excludes {
    rules: Vec<ExcludeRule>,
}

impl Excludes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration strings: globs first, then regexes
    pub fn from_patterns(globs: &[String], regexes: &[String]) -> Result<Self, ExcludeError> {
        let mut rules = Vec::with_capacity(globs.len() + regexes.len());
        for glob in globs {
            rules.push(ExcludeRule::glob(glob)?);
        }
        for regex in regexes {
            rules.push(ExcludeRule::regex(regex)?);
        }
        Ok(Excludes { rules })
    }

    pub fn push(&mut self, rule: ExcludeRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if any rule matches the module
    pub fn is_excluded(&self, code: &str, id: &str) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let id = normalize_id(id);
        self.rules.iter().any(|rule| rule.matches(code, &id))
    }
}

impl FromIterator<ExcludeRule> for Excludes {
    fn from_iter<I: IntoIterator<Item = ExcludeRule>>(iter: I) -> Self {
        Excludes {
            rules: iter.into_iter().collect(),
        }
    }
}
