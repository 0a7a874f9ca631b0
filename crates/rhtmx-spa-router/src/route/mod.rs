/// Route module
///
/// A route couples a compiled pattern with the handler it dispatches to,
/// plus optional naming and metadata used by the layers above.

pub mod pattern;

pub use pattern::{Captures, RoutePattern};

use crate::{RouteMatch, RouterError};
use std::collections::HashMap;
use std::fmt;

/// Boxed route handler
///
/// Receives the match and the caller's context. `R` is whatever the
/// context's owner wants back from a dispatch (often `()` or a `Result`).
pub type Handler<Ctx, R> = Box<dyn Fn(&RouteMatch, &mut Ctx) -> R + Send + Sync>;

/// A pattern bound to its handler
pub struct Route<Ctx, R = ()> {
    pattern: RoutePattern,
    handler: Handler<Ctx, R>,
    /// Optional name for lookups and logs
    pub name: Option<String>,
    /// Arbitrary metadata (e.g. `auth = "required"`)
    pub metadata: HashMap<String, String>,
}

impl<Ctx, R> Route<Ctx, R> {
    /// Builds a route, compiling `pattern`
    pub fn new<F>(pattern: &str, handler: F) -> Result<Self, RouterError>
    where
        F: Fn(&RouteMatch, &mut Ctx) -> R + Send + Sync + 'static,
    {
        Ok(Self {
            pattern: RoutePattern::new(pattern)?,
            handler: Box::new(handler),
            name: None,
            metadata: HashMap::new(),
        })
    }

    /// Sets the route name (builder style)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a metadata entry (builder style)
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Gets a metadata value
    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// The compiled pattern
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Matches `path` against this route alone
    pub fn matches(&self, path: &str) -> Option<RouteMatch> {
        self.pattern
            .captures(path)
            .map(|captures| RouteMatch::new(path, captures))
    }

    pub(crate) fn invoke(&self, route_match: &RouteMatch, ctx: &mut Ctx) -> R {
        (self.handler)(route_match, ctx)
    }
}

impl<Ctx, R> fmt::Debug for Route<Ctx, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish()
    }
}
