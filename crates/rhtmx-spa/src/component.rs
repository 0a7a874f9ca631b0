// File: src/component.rs
// Purpose: Component activation, data access and action capabilities

use crate::auth::{AuthError, AuthGate};
use crate::dom::{Element, Mountable};
use crate::renderer::Renderer;
use crate::template_loader::TemplateLoader;
use crate::value::{ComponentData, Value};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Attribute carrying the bound template name on the host element
pub const TEMPLATE_ATTRIBUTE: &str = "data-template";

/// Errors raised by component operations
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("template `{0}` not found")]
    TemplateNotFound(String),

    #[error("component `{component}` has no action `{action}`")]
    UnknownAction { component: String, action: String },

    #[error("failed to serialize component data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A host element augmented with a template binding and data access
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    host: Element,
    data: ComponentData,
    template: String,
}

impl Component {
    /// Turns `host` into a component bound to `template`
    ///
    /// The component owns its data; nothing is shared with other
    /// instances beyond what the caller passes in.
    pub fn activate(mut host: Element, data: ComponentData, template: impl Into<String>) -> Self {
        let template = template.into();
        host.set_attribute(TEMPLATE_ATTRIBUTE, template.as_str());
        debug!(tag = host.tag(), template = %template, "component activated");
        Self {
            host,
            data,
            template,
        }
    }

    /// Value stored under `key`
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// String value stored under `key`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_data(key).and_then(Value::as_str)
    }

    /// The full data mapping
    pub fn data(&self) -> &ComponentData {
        &self.data
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Rebinds the component to another template
    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
        self.host
            .set_attribute(TEMPLATE_ATTRIBUTE, self.template.as_str());
    }

    /// Renders the bound template with this component's data into the host
    pub fn render(&mut self, templates: &TemplateLoader) -> Result<(), ComponentError> {
        let template = templates
            .get(&self.template)
            .ok_or_else(|| ComponentError::TemplateNotFound(self.template.clone()))?;
        let html = Renderer::new(&self.data).render(&template.content);
        self.host.set_inner_html(html);
        Ok(())
    }

    /// Data serialized as JSON, for logging and saving
    pub fn data_json(&self) -> Result<String, ComponentError> {
        Ok(serde_json::to_string(&self.data)?)
    }

    pub fn host(&self) -> &Element {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Element {
        &mut self.host
    }

    pub fn into_host(self) -> Element {
        self.host
    }
}

impl Mountable for Component {
    fn host(&self) -> &Element {
        &self.host
    }
}

/// Access to the component wrapped by a component kind
pub trait AsComponent {
    fn component(&self) -> &Component;
    fn component_mut(&mut self) -> &mut Component;
}

impl AsComponent for Component {
    fn component(&self) -> &Component {
        self
    }

    fn component_mut(&mut self) -> &mut Component {
        self
    }
}

/// Components with a `save` action
pub trait Saveable: AsComponent {
    /// Saves the component's data; returns the payload that was saved
    fn save(&self) -> Result<String, ComponentError> {
        let payload = self.component().data_json()?;
        info!(template = self.component().template(), data = %payload, "SAVING");
        Ok(payload)
    }
}

/// Components exposing arbitrarily named actions
pub trait Actionable: AsComponent {
    /// Names of the actions this component answers to
    fn actions(&self) -> &'static [&'static str];

    /// Runs the action named `action`
    fn invoke(&self, action: &str) -> Result<(), ComponentError>;

    fn unknown_action(&self, action: &str) -> ComponentError {
        ComponentError::UnknownAction {
            component: self.component().host().tag().to_string(),
            action: action.to_string(),
        }
    }
}

/// Components that can drive the auth gate's login transition
#[async_trait]
pub trait LoginCapable: AsComponent + Sync {
    fn gate(&self) -> &Arc<AuthGate>;

    /// Logs in with the `username` / `password` values from the component data
    async fn login(&self, cancel: &CancellationToken) -> Result<(), AuthError> {
        let username = self
            .component()
            .get_str("username")
            .ok_or(AuthError::MissingCredential("username"))?;
        let password = self
            .component()
            .get_str("password")
            .ok_or(AuthError::MissingCredential("password"))?;
        self.gate().login(username, password, cancel).await
    }

    /// Logs in with explicit credentials
    async fn login_with(
        &self,
        username: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError> {
        self.gate().login(username, password, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data(pairs: &[(&str, &str)]) -> ComponentData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_get_data_returns_stored_values() {
        let initial = data(&[("testkey", "another example"), ("namekey", "Jos")]);
        let component = Component::activate(Element::new("another"), initial.clone(), "example");

        assert_eq!(component.get_data("namekey"), Some(&Value::from("Jos")));
        assert_eq!(component.get_data("missing"), None);
        assert_eq!(component.data(), &initial);
    }

    #[test]
    fn test_activate_binds_template() {
        let component = Component::activate(Element::new("login"), ComponentData::new(), "login");
        assert_eq!(component.template(), "login");
        assert_eq!(component.host().attribute(TEMPLATE_ATTRIBUTE), Some("login"));
    }

    #[test]
    fn test_instances_are_independent() {
        let initial = data(&[("username", "jos")]);
        let mut first = Component::activate(Element::new("login"), initial.clone(), "login");
        let second = Component::activate(Element::new("login"), initial, "login");

        first.set_data("username", "someone-else");
        assert_eq!(first.get_str("username"), Some("someone-else"));
        assert_eq!(second.get_str("username"), Some("jos"));
    }

    #[test]
    fn test_render_into_host() {
        let templates = TemplateLoader::default().with_template("example", "<p>{testkey}</p>");
        let mut component = Component::activate(
            Element::new("example"),
            data(&[("testkey", "hello")]),
            "example",
        );
        component.render(&templates).unwrap();
        assert_eq!(component.host().inner_html(), "<p>hello</p>");
    }

    #[test]
    fn test_render_missing_template() {
        let mut component = Component::activate(Element::new("x"), ComponentData::new(), "nope");
        let err = component.render(&TemplateLoader::default()).unwrap_err();
        assert!(matches!(err, ComponentError::TemplateNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_set_template_rebinds() {
        let mut component = Component::activate(Element::new("x"), ComponentData::new(), "a");
        component.set_template("b");
        assert_eq!(component.template(), "b");
        assert_eq!(component.host().attribute(TEMPLATE_ATTRIBUTE), Some("b"));
    }
}
