// RHTMX SPA - client-side components for RHTMX
// Route dispatch, component activation and an auth-gated login flow

pub mod value;
pub mod dom;

// Framework modules
pub mod renderer;
pub mod template_loader;
pub mod component;
pub mod components;
pub mod registration;
pub mod auth;
pub mod config;
pub mod app;

// Re-export framework types
pub use app::{App, Navigation, NavigationResult, RouteResult, Scene, REDIRECT_URI};
pub use auth::{
    AuthError, AuthGate, AuthState, Authenticator, Claims, LoginSource, StaticCredentials,
};
pub use component::{
    Actionable, AsComponent, Component, ComponentError, LoginCapable, Saveable,
};
pub use components::{
    stock_registrations, AnotherExample, ExampleComponent, LoginComponent, Widget,
};
pub use config::Config;
pub use dom::{Container, Element, MountMode, Mountable};
pub use registration::{Registration, RouteSpec, Services};
pub use renderer::Renderer;
pub use template_loader::TemplateLoader;
pub use value::{data_from_json, ComponentData, Value};

// Re-export the router and the cancellation token used by login
pub use rhtmx_spa_router as router;
pub use tokio_util::sync::CancellationToken;
