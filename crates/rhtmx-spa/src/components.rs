// File: src/components.rs
// Purpose: Stock component kinds and their registrations

use crate::auth::AuthGate;
use crate::component::{
    Actionable, AsComponent, Component, ComponentError, LoginCapable, Saveable,
};
use crate::dom::{Element, Mountable, MountMode};
use crate::registration::{Registration, RouteSpec, Services};
use crate::template_loader::TemplateLoader;
use crate::value::ComponentData;
use std::sync::Arc;
use tracing::info;

/// Demo component with a save action and two named actions
#[derive(Debug, Clone)]
pub struct ExampleComponent {
    inner: Component,
}

impl ExampleComponent {
    pub const TEMPLATE: &'static str = "example";

    pub fn new(host: Element, data: ComponentData) -> Self {
        Self {
            inner: Component::activate(host, data, Self::TEMPLATE),
        }
    }
}

impl AsComponent for ExampleComponent {
    fn component(&self) -> &Component {
        &self.inner
    }

    fn component_mut(&mut self) -> &mut Component {
        &mut self.inner
    }
}

impl Saveable for ExampleComponent {}

impl Actionable for ExampleComponent {
    fn actions(&self) -> &'static [&'static str] {
        &["save", "exampleAction", "anotherAction"]
    }

    fn invoke(&self, action: &str) -> Result<(), ComponentError> {
        match action {
            "save" => self.save().map(|_| ()),
            "exampleAction" => {
                info!("example action");
                Ok(())
            }
            "anotherAction" => {
                info!("another action");
                Ok(())
            }
            other => Err(self.unknown_action(other)),
        }
    }
}

/// Second demo component sharing the `example` template; save only
#[derive(Debug, Clone)]
pub struct AnotherExample {
    inner: Component,
}

impl AnotherExample {
    pub const TEMPLATE: &'static str = "example";

    pub fn new(host: Element, data: ComponentData) -> Self {
        Self {
            inner: Component::activate(host, data, Self::TEMPLATE),
        }
    }
}

impl AsComponent for AnotherExample {
    fn component(&self) -> &Component {
        &self.inner
    }

    fn component_mut(&mut self) -> &mut Component {
        &mut self.inner
    }
}

impl Saveable for AnotherExample {}

impl Actionable for AnotherExample {
    fn actions(&self) -> &'static [&'static str] {
        &["save"]
    }

    fn invoke(&self, action: &str) -> Result<(), ComponentError> {
        match action {
            "save" => self.save().map(|_| ()),
            other => Err(self.unknown_action(other)),
        }
    }
}

/// Login form component; drives the auth gate
#[derive(Debug, Clone)]
pub struct LoginComponent {
    inner: Component,
    gate: Arc<AuthGate>,
}

impl LoginComponent {
    pub const TEMPLATE: &'static str = "login";

    pub fn new(host: Element, data: ComponentData, gate: Arc<AuthGate>) -> Self {
        Self {
            inner: Component::activate(host, data, Self::TEMPLATE),
            gate,
        }
    }
}

impl AsComponent for LoginComponent {
    fn component(&self) -> &Component {
        &self.inner
    }

    fn component_mut(&mut self) -> &mut Component {
        &mut self.inner
    }
}

impl LoginCapable for LoginComponent {
    fn gate(&self) -> &Arc<AuthGate> {
        &self.gate
    }
}

/// Every component kind the framework knows how to mount
#[derive(Debug, Clone)]
pub enum Widget {
    Example(ExampleComponent),
    AnotherExample(AnotherExample),
    Login(LoginComponent),
    /// A bare component without actions
    Plain(Component),
}

impl Widget {
    pub fn render(&mut self, templates: &TemplateLoader) -> Result<(), ComponentError> {
        self.component_mut().render(templates)
    }

    pub fn as_saveable(&self) -> Option<&dyn Saveable> {
        match self {
            Widget::Example(c) => Some(c),
            Widget::AnotherExample(c) => Some(c),
            Widget::Login(_) | Widget::Plain(_) => None,
        }
    }

    pub fn as_actionable(&self) -> Option<&dyn Actionable> {
        match self {
            Widget::Example(c) => Some(c),
            Widget::AnotherExample(c) => Some(c),
            Widget::Login(_) | Widget::Plain(_) => None,
        }
    }

    pub fn as_login(&self) -> Option<&LoginComponent> {
        match self {
            Widget::Login(c) => Some(c),
            _ => None,
        }
    }

    /// Runs a named action, the way a UI event binder would
    pub fn invoke(&self, action: &str) -> Result<(), ComponentError> {
        match self.as_actionable() {
            Some(actionable) => actionable.invoke(action),
            None => Err(ComponentError::UnknownAction {
                component: self.component().host().tag().to_string(),
                action: action.to_string(),
            }),
        }
    }
}

impl AsComponent for Widget {
    fn component(&self) -> &Component {
        match self {
            Widget::Example(c) => c.component(),
            Widget::AnotherExample(c) => c.component(),
            Widget::Login(c) => c.component(),
            Widget::Plain(c) => c,
        }
    }

    fn component_mut(&mut self) -> &mut Component {
        match self {
            Widget::Example(c) => c.component_mut(),
            Widget::AnotherExample(c) => c.component_mut(),
            Widget::Login(c) => c.component_mut(),
            Widget::Plain(c) => c,
        }
    }
}

impl Mountable for Widget {
    fn host(&self) -> &Element {
        self.component().host()
    }
}

impl From<Component> for Widget {
    fn from(component: Component) -> Self {
        Widget::Plain(component)
    }
}

/// `example` component, mounted by `/example/<anything>`
pub fn example_registration() -> Registration {
    Registration::new("example", |host, data, _: &Services| {
        Widget::Example(ExampleComponent::new(host, data))
    })
    .route(RouteSpec::new(r"/example/(.*)").mount_mode(MountMode::Replace))
}

/// `anotherexample` component; its route appends instead of replacing
pub fn another_example_registration() -> Registration {
    Registration::new("anotherexample", |host, data, _: &Services| {
        Widget::AnotherExample(AnotherExample::new(host, data))
    })
    .with_tag("another")
    .route(
        RouteSpec::new("anotherexample")
            .mount_mode(MountMode::Append)
            .with_data("testkey", "another example")
            .with_data("namekey", "Jos"),
    )
}

/// `login` component, mounted by `/login`
pub fn login_registration() -> Registration {
    Registration::new("login", |host, data, services: &Services| {
        Widget::Login(LoginComponent::new(host, data, Arc::clone(&services.gate)))
    })
    .route(RouteSpec::new("/login").mount_mode(MountMode::Replace))
}

/// All stock registrations, in their registration order
pub fn stock_registrations() -> Vec<Registration> {
    vec![
        example_registration(),
        another_example_registration(),
        login_registration(),
    ]
}
