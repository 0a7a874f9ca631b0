/// Compiled route patterns
///
/// A pattern is a regular expression tested against the whole navigation
/// path the way a browser-side `RegExp.test` would: unanchored, so
/// `/example/(.*)` also matches `/app/example/42`. Anchor with `^`/`$`
/// when that is not wanted.

use crate::RouterError;
use regex::Regex;
use std::collections::HashMap;

/// A validated route pattern
#[derive(Debug, Clone)]
pub struct RoutePattern {
    regex: Regex,
}

/// Capture groups extracted from one successful match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    /// Positional groups 1..n; `None` for groups that did not participate
    pub groups: Vec<Option<String>>,
    /// Named groups that participated in the match
    pub named: HashMap<String, String>,
}

impl RoutePattern {
    /// Compiles `source`, rejecting malformed expressions
    ///
    /// ```
    /// use rhtmx_spa_router::route::RoutePattern;
    ///
    /// assert!(RoutePattern::new(r"/example/(.*)").is_ok());
    /// assert!(RoutePattern::new(r"/example/(.*").is_err());
    /// ```
    pub fn new(source: &str) -> Result<Self, RouterError> {
        Regex::new(source)
            .map(|regex| Self { regex })
            .map_err(|err| RouterError::InvalidPattern {
                pattern: source.to_string(),
                reason: err.to_string(),
            })
    }

    /// Source text of the pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Cheap match test without capture extraction
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Runs the pattern against `path` and collects its groups
    pub fn captures(&self, path: &str) -> Option<Captures> {
        let caps = self.regex.captures(path)?;

        let groups = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();

        let named = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_string(), m.as_str().to_string()))
            })
            .collect();

        Some(Captures { groups, named })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_groups() {
        let pattern = RoutePattern::new(r"/example/(.*)").unwrap();
        let caps = pattern.captures("/example/42").unwrap();
        assert_eq!(caps.groups, vec![Some("42".to_string())]);
        assert!(caps.named.is_empty());
    }

    #[test]
    fn test_unanchored_search() {
        let pattern = RoutePattern::new("anotherexample").unwrap();
        assert!(pattern.is_match("/anotherexample"));
        assert!(pattern.is_match("/x/anotherexample/y"));
        assert!(!pattern.is_match("/example"));
    }

    #[test]
    fn test_optional_group_not_participating() {
        let pattern = RoutePattern::new(r"^/users(?:/(\d+))?$").unwrap();
        let caps = pattern.captures("/users").unwrap();
        assert_eq!(caps.groups, vec![None]);
    }

    #[test]
    fn test_named_groups() {
        let pattern = RoutePattern::new(r"^/users/(?P<id>\d+)/(?P<tab>\w+)$").unwrap();
        let caps = pattern.captures("/users/7/posts").unwrap();
        assert_eq!(caps.named.get("id").map(String::as_str), Some("7"));
        assert_eq!(caps.named.get("tab").map(String::as_str), Some("posts"));
        assert_eq!(caps.groups.len(), 2);
    }

    #[test]
    fn test_invalid_pattern_reports_source() {
        let err = RoutePattern::new("/broken/(").unwrap_err();
        match err {
            RouterError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "/broken/("),
        }
    }
}
