//! Path filters applied to dependency imports and exports
//!
//! A filter decides whether a resource path (for example `com/acme/util`)
//! may cross a dependency edge. Paths use `/` as the separator and never
//! start with one.

use crate::error::SpecError;
use glob::{MatchOptions, Pattern};
use std::fmt;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A predicate over resource paths
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PathFilter {
    /// Accepts every path
    #[default]
    AcceptAll,

    /// Rejects every path
    RejectAll,

    /// Accepts exactly one path
    Literal(String),

    /// Accepts paths strictly below a directory
    ChildOf(String),

    /// Accepts a directory and every path below it
    EqualOrChildOf(String),

    /// Accepts paths matching a glob (`*` stays within a segment, `**` spans segments)
    Glob(Pattern),

    /// Inverts another filter
    Not(Box<PathFilter>),

    /// Accepts when every member accepts (an empty set accepts)
    AllOf(Vec<PathFilter>),

    /// Accepts when any member accepts (an empty set rejects)
    AnyOf(Vec<PathFilter>),

    /// Ordered include/exclude rules; the first matching rule decides
    Rules(PathFilterRules),
}

/// First-match-wins list of include and exclude rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilterRules {
    rules: Vec<(PathFilter, bool)>,
    default: bool,
}

impl PathFilter {
    pub fn accept_all() -> Self {
        PathFilter::AcceptAll
    }

    pub fn reject_all() -> Self {
        PathFilter::RejectAll
    }

    pub fn literal(path: &str) -> Self {
        PathFilter::Literal(normalize(path))
    }

    pub fn is_child_of(path: &str) -> Self {
        PathFilter::ChildOf(normalize(path))
    }

    pub fn is_or_is_child_of(path: &str) -> Self {
        PathFilter::EqualOrChildOf(normalize(path))
    }

    /// Compile a glob filter
    pub fn matches(glob: &str) -> Result<Self, SpecError> {
        let pattern = Pattern::new(&normalize(glob)).map_err(|e| {
            SpecError::InvalidSpecification(format!("Invalid path glob '{}': {}", glob, e))
        })?;
        Ok(PathFilter::Glob(pattern))
    }

    pub fn not(filter: PathFilter) -> Self {
        PathFilter::Not(Box::new(filter))
    }

    pub fn all_of(filters: Vec<PathFilter>) -> Self {
        PathFilter::AllOf(filters)
    }

    pub fn any_of(filters: Vec<PathFilter>) -> Self {
        PathFilter::AnyOf(filters)
    }

    /// Start an ordered rule list that falls back to `default`
    pub fn rules(default: bool) -> PathFilterRulesBuilder {
        PathFilterRulesBuilder {
            rules: PathFilterRules {
                rules: Vec::new(),
                default,
            },
        }
    }

    /// Check whether `path` passes this filter
    pub fn accept(&self, path: &str) -> bool {
        let path = path.trim_matches('/');
        match self {
            PathFilter::AcceptAll => true,
            PathFilter::RejectAll => false,
            PathFilter::Literal(p) => path == p,
            PathFilter::ChildOf(dir) => is_below(path, dir),
            PathFilter::EqualOrChildOf(dir) => path == dir || is_below(path, dir),
            PathFilter::Glob(pattern) => pattern.matches_with(path, GLOB_OPTIONS),
            PathFilter::Not(inner) => !inner.accept(path),
            PathFilter::AllOf(filters) => filters.iter().all(|f| f.accept(path)),
            PathFilter::AnyOf(filters) => filters.iter().any(|f| f.accept(path)),
            PathFilter::Rules(rules) => rules.accept(path),
        }
    }

    pub fn is_accept_all(&self) -> bool {
        matches!(self, PathFilter::AcceptAll)
    }
}

impl PathFilterRules {
    fn accept(&self, path: &str) -> bool {
        self.rules
            .iter()
            .find(|(filter, _)| filter.accept(path))
            .map(|(_, include)| *include)
            .unwrap_or(self.default)
    }
}

/// Builder for [`PathFilter::Rules`]
#[derive(Debug)]
pub struct PathFilterRulesBuilder {
    rules: PathFilterRules,
}

impl PathFilterRulesBuilder {
    /// Accept paths matching `filter` unless an earlier rule decided otherwise
    pub fn include(mut self, filter: PathFilter) -> Self {
        self.rules.rules.push((filter, true));
        self
    }

    /// Reject paths matching `filter` unless an earlier rule decided otherwise
    pub fn exclude(mut self, filter: PathFilter) -> Self {
        self.rules.rules.push((filter, false));
        self
    }

    pub fn build(self) -> PathFilter {
        if self.rules.rules.is_empty() {
            return if self.rules.default {
                PathFilter::AcceptAll
            } else {
                PathFilter::RejectAll
            };
        }
        PathFilter::Rules(self.rules)
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn is_below(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return !path.is_empty();
    }
    path.len() > dir.len() + 1 && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, filters: &[PathFilter]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", filter)?;
    }
    write!(f, ")")
}

impl fmt::Display for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathFilter::AcceptAll => write!(f, "accept-all"),
            PathFilter::RejectAll => write!(f, "reject-all"),
            PathFilter::Literal(p) => write!(f, "literal({})", p),
            PathFilter::ChildOf(p) => write!(f, "child-of({})", p),
            PathFilter::EqualOrChildOf(p) => write!(f, "equal-or-child-of({})", p),
            PathFilter::Glob(p) => write!(f, "glob({})", p.as_str()),
            PathFilter::Not(inner) => write!(f, "not({})", inner),
            PathFilter::AllOf(filters) => write_list(f, "all-of", filters),
            PathFilter::AnyOf(filters) => write_list(f, "any-of", filters),
            PathFilter::Rules(rules) => {
                write!(f, "rules[")?;
                for (filter, include) in &rules.rules {
                    write!(f, "{}{} ", if *include { '+' } else { '-' }, filter)?;
                }
                write!(f, "default={}]", if rules.default { "accept" } else { "reject" })
            }
        }
    }
}
