// File: src/registration.rs
// Purpose: Component registration records processed at bootstrap

use crate::auth::AuthGate;
use crate::components::Widget;
use crate::dom::{Element, MountMode};
use crate::value::{ComponentData, Value};
use std::fmt;
use std::sync::Arc;

/// Shared collaborators handed to component factories
#[derive(Debug, Clone)]
pub struct Services {
    pub gate: Arc<AuthGate>,
}

/// Builds a component kind from a fresh host element and its data
pub type Factory = Arc<dyn Fn(Element, ComponentData, &Services) -> Widget + Send + Sync>;

/// One route a component answers to
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub pattern: String,
    /// `None` uses the app's configured default
    pub mount_mode: Option<MountMode>,
    /// Only reachable once authenticated
    pub guarded: bool,
    /// Defaults merged under the navigation payload
    pub data: ComponentData,
}

impl RouteSpec {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mount_mode: None,
            guarded: false,
            data: ComponentData::new(),
        }
    }

    pub fn mount_mode(mut self, mode: MountMode) -> Self {
        self.mount_mode = Some(mode);
        self
    }

    pub fn guarded(mut self) -> Self {
        self.guarded = true;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// A component factory together with the routes that mount it
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    /// Tag of the host element created for route mounts
    pub tag: String,
    pub factory: Factory,
    pub routes: Vec<RouteSpec>,
}

impl Registration {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Element, ComponentData, &Services) -> Widget + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            tag: name.clone(),
            name,
            factory: Arc::new(factory),
            routes: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn route(mut self, route: RouteSpec) -> Self {
        self.routes.push(route);
        self
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("routes", &self.routes)
            .finish()
    }
}
