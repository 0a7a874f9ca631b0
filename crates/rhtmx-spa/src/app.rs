// File: src/app.rs
// Purpose: Composition root wiring router, container, templates and auth gate

use crate::auth::{AuthGate, AuthState, Authenticator};
use crate::component::{AsComponent, ComponentError};
use crate::components::Widget;
use crate::config::Config;
use crate::dom::{Container, Element, MountMode};
use crate::registration::{Registration, RouteSpec, Services};
use crate::template_loader::TemplateLoader;
use crate::value::{ComponentData, Value};
use anyhow::{Context, Result};
use rhtmx_spa_router::{Dispatch, Route, RouteMatch, Router, RouterError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Route metadata key marking a route as auth-gated
pub const AUTH_META: &str = "auth";
const AUTH_REQUIRED: &str = "required";

/// Login data key holding the path a redirected visitor asked for
pub const REDIRECT_URI: &str = "uri";

/// What route handlers return
pub type RouteResult = std::result::Result<(), ComponentError>;

/// What [`App::navigate`] returns
pub type NavigationResult = std::result::Result<Navigation, ComponentError>;

/// Everything a route handler may touch
#[derive(Debug)]
pub struct Scene {
    pub main: Container<Widget>,
    pub templates: TemplateLoader,
    pub services: Services,
    default_mount: MountMode,
    payload: ComponentData,
}

/// How a navigation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The route at `route` matched and mounted its component
    Mounted { route: usize },
    /// The matched route is gated; the login route mounted instead
    RedirectedToLogin { route: usize },
    /// Nothing to resume: no redirect pending, or still not authenticated
    Idle,
    /// Nothing matched; the document is unchanged
    Miss,
}

/// A single-page application: routes, main container and auth gate
pub struct App {
    config: Config,
    router: Router<Scene, RouteResult>,
    scene: Scene,
    components: HashMap<String, Registration>,
    pending: Option<String>,
}

impl App {
    /// Creates an app whose gate uses `authenticator`
    pub fn new(config: Config, authenticator: Arc<dyn Authenticator>) -> Self {
        let gate = AuthGate::new(authenticator).with_timeout(config.auth.timeout());
        Self::with_gate(config, Arc::new(gate))
    }

    /// Creates an app around an already configured gate
    pub fn with_gate(config: Config, gate: Arc<AuthGate>) -> Self {
        let scene = Scene {
            main: Container::new(config.app.main.clone()),
            templates: TemplateLoader::new(&config.routing.components_dir),
            services: Services { gate },
            default_mount: config.app.mount_mode,
            payload: ComponentData::new(),
        };

        Self {
            router: Router::with_normalization(config.routing.normalize_paths),
            config,
            scene,
            components: HashMap::new(),
            pending: None,
        }
    }

    /// Loads templates from the configured components directory
    pub fn load_templates(&mut self) -> Result<usize> {
        let count = self
            .scene
            .templates
            .load_all()
            .context("Failed to load component templates")?;
        info!(count, dir = %self.config.routing.components_dir, "templates loaded");
        Ok(count)
    }

    pub fn templates_mut(&mut self) -> &mut TemplateLoader {
        &mut self.scene.templates
    }

    /// Processes registration records in order
    pub fn bootstrap(
        &mut self,
        registrations: impl IntoIterator<Item = Registration>,
    ) -> Result<()> {
        for registration in registrations {
            let name = registration.name.clone();
            self.register(registration)
                .with_context(|| format!("Failed to register component `{}`", name))?;
        }
        info!(
            routes = self.router.len(),
            components = self.components.len(),
            "bootstrap complete"
        );
        Ok(())
    }

    /// Registers one component and its routes
    ///
    /// All route patterns are validated before anything is added, so a
    /// malformed pattern leaves the app untouched.
    pub fn register(&mut self, registration: Registration) -> std::result::Result<(), RouterError> {
        let mut routes = Vec::with_capacity(registration.routes.len());
        for spec in &registration.routes {
            let handler = mount_handler(&registration, spec.clone());
            let mut route =
                Route::new(&spec.pattern, handler)?.with_name(registration.name.clone());
            if spec.guarded {
                route = route.with_meta(AUTH_META, AUTH_REQUIRED);
            }
            routes.push(route);
        }

        for route in routes {
            info!(
                component = %registration.name,
                pattern = route.pattern().as_str(),
                "adding route"
            );
            self.router.add_route(route);
        }
        self.components
            .insert(registration.name.clone(), registration);
        Ok(())
    }

    /// Application-ready signal: runs the gate's startup check
    pub fn ready(&self) -> AuthState {
        self.scene.services.gate.ready()
    }

    /// Feeds a navigation into the router
    pub fn navigate(&mut self, path: &str, data: ComponentData) -> NavigationResult {
        info!(path, ?data, "ROUTE");

        let Some((index, route, _)) = self.router.find(path) else {
            return Ok(Navigation::Miss);
        };

        if is_guarded(route) && !self.scene.services.gate.is_authenticated() {
            return self.redirect_to_login(path, index, data);
        }

        self.scene.payload = data;
        Ok(match self.router.dispatch(path, &mut self.scene) {
            Dispatch::Handled { index, output } => {
                output?;
                Navigation::Mounted { route: index }
            }
            Dispatch::Miss => Navigation::Miss,
        })
    }

    /// Navigates to the path a login redirect interrupted
    ///
    /// Returns [`Navigation::Idle`] while the gate is not authenticated or
    /// when no redirect is pending.
    pub fn resume(&mut self) -> NavigationResult {
        if !self.scene.services.gate.is_authenticated() {
            return Ok(Navigation::Idle);
        }
        match self.pending.take() {
            Some(path) => {
                info!(path = %path, "resuming after login");
                self.navigate(&path, ComponentData::new())
            }
            None => Ok(Navigation::Idle),
        }
    }

    /// Path waiting for [`App::resume`]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    fn redirect_to_login(
        &mut self,
        path: &str,
        route: usize,
        mut data: ComponentData,
    ) -> NavigationResult {
        let login_path = self.config.auth.login_path.clone();
        warn!(path, login = %login_path, "route requires authentication");

        match self.router.find(&login_path) {
            Some((_, login_route, _)) if !is_guarded(login_route) => {}
            _ => {
                warn!(login = %login_path, "no unguarded login route");
                return Ok(Navigation::Miss);
            }
        }

        data.insert(REDIRECT_URI.to_string(), Value::from(path));
        self.scene.payload = data;
        match self.router.dispatch(&login_path, &mut self.scene) {
            Dispatch::Handled { output, .. } => {
                output?;
                self.pending = Some(path.to_string());
                Ok(Navigation::RedirectedToLogin { route })
            }
            Dispatch::Miss => Ok(Navigation::Miss),
        }
    }

    /// Creates a registered component on demand, outside of routing
    pub fn create(&self, name: &str, data: ComponentData) -> Option<Widget> {
        let registration = self.components.get(name)?;
        let host = Element::new(registration.tag.as_str());
        Some((registration.factory)(host, data, &self.scene.services))
    }

    /// Renders `widget` and mounts it into the main container
    pub fn mount(&mut self, mut widget: Widget, mode: MountMode) -> RouteResult {
        widget.render(&self.scene.templates)?;
        self.scene.main.mount(widget, mode);
        Ok(())
    }

    pub fn main(&self) -> &Container<Widget> {
        &self.scene.main
    }

    pub fn main_mut(&mut self) -> &mut Container<Widget> {
        &mut self.scene.main
    }

    pub fn gate(&self) -> &Arc<AuthGate> {
        &self.scene.services.gate
    }

    pub fn router(&self) -> &Router<Scene, RouteResult> {
        &self.router
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("router", &self.router)
            .field("scene", &self.scene)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("pending", &self.pending)
            .finish()
    }
}

fn is_guarded(route: &Route<Scene, RouteResult>) -> bool {
    route.get_meta(AUTH_META) == Some(AUTH_REQUIRED)
}

/// Handler that creates, renders and mounts the registration's component
fn mount_handler(
    registration: &Registration,
    spec: RouteSpec,
) -> impl Fn(&RouteMatch, &mut Scene) -> RouteResult + Send + Sync + 'static {
    let factory = Arc::clone(&registration.factory);
    let name = registration.name.clone();
    let tag = registration.tag.clone();

    move |route_match: &RouteMatch, scene: &mut Scene| {
        debug!(component = %name, path = %route_match.path, "route matched");

        let data = route_data(&spec.data, std::mem::take(&mut scene.payload), route_match);
        let mut widget = factory(Element::new(tag.as_str()), data, &scene.services);
        widget.component_mut().render(&scene.templates)?;

        let mode = spec.mount_mode.unwrap_or(scene.default_mount);
        scene.main.mount(widget, mode);
        Ok(())
    }
}

/// Route defaults, overridden by the payload, then by named captures
fn route_data(
    defaults: &ComponentData,
    payload: ComponentData,
    route_match: &RouteMatch,
) -> ComponentData {
    let mut data = defaults.clone();
    data.extend(payload);
    data.extend(
        route_match
            .params
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str()))),
    );
    if !route_match.groups.is_empty() {
        let groups = route_match
            .groups
            .iter()
            .map(|g| g.as_deref().map(Value::from).unwrap_or(Value::Null))
            .collect::<Vec<_>>();
        data.insert("captures".to_string(), Value::Array(groups));
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(pattern: &str, path: &str) -> RouteMatch {
        let route: Route<(), ()> = Route::new(pattern, |_, _| ()).unwrap();
        route.matches(path).unwrap()
    }

    #[test]
    fn test_route_data_precedence() {
        let mut defaults = ComponentData::new();
        defaults.insert("namekey".to_string(), Value::from("Jos"));
        defaults.insert("id".to_string(), Value::from("default"));

        let mut payload = ComponentData::new();
        payload.insert("namekey".to_string(), Value::from("Ann"));

        let m = matched(r"^/users/(?P<id>\d+)$", "/users/5");
        let data = route_data(&defaults, payload, &m);

        assert_eq!(data.get("namekey"), Some(&Value::from("Ann")));
        assert_eq!(data.get("id"), Some(&Value::from("5")));
        assert_eq!(data.get("captures"), Some(&Value::Array(vec![Value::from("5")])));
    }

    #[test]
    fn test_route_data_without_groups() {
        let m = matched("/login", "/login");
        let data = route_data(&ComponentData::new(), ComponentData::new(), &m);
        assert!(data.is_empty());
    }
}
