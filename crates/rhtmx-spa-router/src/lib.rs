//! # RHTMX SPA Router
//!
//! An ordered pattern → handler table for client-side navigation:
//! - Patterns are regular expressions with optional capture groups
//! - Insertion order is significant: the **first** matching route wins
//! - A path nothing matches is a silent miss, not an error
//! - Malformed patterns are rejected when they are added
//!
//! The router knows nothing about documents or components. Handlers get the
//! match plus a caller-owned context (`Ctx`) and return whatever the caller
//! wants back (`R`).
//!
//! ## Example
//!
//! ```
//! use rhtmx_spa_router::{Dispatch, Router};
//!
//! let mut router: Router<Vec<String>> = Router::new();
//! router
//!     .add(r"/example/(.*)", |m, seen: &mut Vec<String>| {
//!         seen.push(m.group(1).unwrap_or_default().to_string());
//!     })
//!     .unwrap();
//!
//! let mut seen = Vec::new();
//! assert!(router.dispatch("/example/42", &mut seen).is_handled());
//! assert!(matches!(router.dispatch("/other", &mut seen), Dispatch::Miss));
//! assert_eq!(seen, vec!["42"]);
//! ```

use std::collections::HashMap;
use tracing::{debug, trace};

pub mod path;
pub mod route;

pub use path::{canonicalize, is_canonical};
pub use route::{Captures, Handler, Route, RoutePattern};

/// Errors raised while building a route table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// The pattern is not a valid regular expression
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Result of matching a route against a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The path that was matched (after normalization, if enabled)
    pub path: String,
    /// Positional capture groups 1..n
    pub groups: Vec<Option<String>>,
    /// Named capture groups that took part in the match
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    fn new(path: &str, captures: Captures) -> Self {
        Self {
            path: path.to_string(),
            groups: captures.groups,
            params: captures.named,
        }
    }

    /// Gets capture group `index` (1-based, like `$1`)
    ///
    /// Group 0 is the path itself.
    pub fn group(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(self.path.as_str()),
            n => self.groups.get(n - 1)?.as_deref(),
        }
    }

    /// Gets a named capture group
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Outcome of a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<R> {
    /// The route at `index` matched and its handler returned `output`
    Handled { index: usize, output: R },
    /// No route matched; nothing ran
    Miss,
}

impl<R> Dispatch<R> {
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled { .. })
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Dispatch::Miss)
    }

    /// Handler output, if a handler ran
    pub fn into_output(self) -> Option<R> {
        match self {
            Dispatch::Handled { output, .. } => Some(output),
            Dispatch::Miss => None,
        }
    }
}

/// Ordered route table
pub struct Router<Ctx, R = ()> {
    routes: Vec<Route<Ctx, R>>,
    normalize_paths: bool,
}

impl<Ctx, R> Router<Ctx, R> {
    /// Creates an empty router that matches paths verbatim
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            normalize_paths: false,
        }
    }

    /// Creates an empty router with path normalization switched on or off
    ///
    /// ```
    /// use rhtmx_spa_router::Router;
    ///
    /// let mut router: Router<()> = Router::with_normalization(true);
    /// router.add(r"^/login$", |_, _| ()).unwrap();
    /// assert!(router.find("/login/").is_some());
    /// ```
    pub fn with_normalization(normalize_paths: bool) -> Self {
        Self {
            routes: Vec::new(),
            normalize_paths,
        }
    }

    pub fn set_normalization(&mut self, normalize_paths: bool) {
        self.normalize_paths = normalize_paths;
    }

    /// Registers `pattern` → `handler` at the end of the table
    ///
    /// Duplicates and overlaps are allowed; earlier registrations win. A
    /// malformed pattern is rejected and the table is left untouched.
    pub fn add<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: Fn(&RouteMatch, &mut Ctx) -> R + Send + Sync + 'static,
    {
        let route = Route::new(pattern, handler)?;
        Ok(self.add_route(route))
    }

    /// Appends an already-built route
    pub fn add_route(&mut self, route: Route<Ctx, R>) -> &mut Self {
        debug!(pattern = route.pattern().as_str(), index = self.routes.len(), "route added");
        self.routes.push(route);
        self
    }

    /// Finds the first matching route without running its handler
    pub fn find(&self, path: &str) -> Option<(usize, &Route<Ctx, R>, RouteMatch)> {
        let path = self.prepare(path);
        self.routes
            .iter()
            .enumerate()
            .find_map(|(index, route)| route.matches(&path).map(|m| (index, route, m)))
    }

    /// Runs the handler of the first route matching `path`
    pub fn dispatch(&self, path: &str, ctx: &mut Ctx) -> Dispatch<R> {
        match self.find(path) {
            Some((index, route, route_match)) => {
                trace!(path, pattern = route.pattern().as_str(), index, "dispatching");
                let output = route.invoke(&route_match, ctx);
                Dispatch::Handled { index, output }
            }
            None => {
                debug!(path, "no route matched");
                Dispatch::Miss
            }
        }
    }

    /// Route by registration index
    pub fn get(&self, index: usize) -> Option<&Route<Ctx, R>> {
        self.routes.get(index)
    }

    /// Route by name (first registered wins)
    pub fn get_named(&self, name: &str) -> Option<&Route<Ctx, R>> {
        self.routes
            .iter()
            .find(|route| route.name.as_deref() == Some(name))
    }

    /// Pattern sources in registration order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.pattern().as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn prepare<'a>(&self, path: &'a str) -> std::borrow::Cow<'a, str> {
        if self.normalize_paths {
            canonicalize(path)
        } else {
            std::borrow::Cow::Borrowed(path)
        }
    }
}

impl<Ctx, R> Default for Router<Ctx, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx, R> std::fmt::Debug for Router<Ctx, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("normalize_paths", &self.normalize_paths)
            .finish()
    }
}
