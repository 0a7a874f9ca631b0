//! Integration tests for the application wiring
//!
//! Navigation through the stock registrations, mount modes, guarded
//! routes and on-demand component creation.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rhtmx_spa::config::UserEntry;
use rhtmx_spa::*;
use std::sync::Arc;

fn templates() -> TemplateLoader {
    TemplateLoader::default()
        .with_template("example", "<h1>{testkey}</h1><p>{namekey}</p>")
        .with_template("login", r#"<form><input name="username" value="{username}"></form>"#)
}

fn credentials() -> Arc<StaticCredentials> {
    Arc::new(StaticCredentials::new([UserEntry {
        username: "jos".to_string(),
        password: "123".to_string(),
        name: None,
        keys: None,
    }]))
}

fn app() -> App {
    let mut app = App::new(Config::default(), credentials());
    *app.templates_mut() = templates();
    app.bootstrap(stock_registrations()).unwrap();
    app.ready();
    app
}

fn data(pairs: &[(&str, &str)]) -> ComponentData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

fn account_registration() -> Registration {
    Registration::new("account", |host, data, _: &Services| {
        Widget::from(Component::activate(host, data, "example"))
    })
    .route(RouteSpec::new("^/account$").guarded())
}

#[test]
fn test_navigate_mounts_example() {
    let mut app = app();

    let outcome = app.navigate("/example/42", ComponentData::new()).unwrap();
    assert_eq!(outcome, Navigation::Mounted { route: 0 });
    assert_eq!(app.main().len(), 1);

    let widget = app.main().last().unwrap();
    assert!(matches!(widget, Widget::Example(_)));
    assert_eq!(
        widget.component().get_data("captures"),
        Some(&Value::Array(vec![Value::from("42")]))
    );
    assert_eq!(widget.host().tag(), "example");
}

#[rstest]
#[case("/example/42", Navigation::Mounted { route: 0 })]
#[case("/app/example/", Navigation::Mounted { route: 0 })]
#[case("/anotherexample", Navigation::Mounted { route: 1 })]
#[case("/login", Navigation::Mounted { route: 2 })]
#[case("/example", Navigation::Miss)]
#[case("/", Navigation::Miss)]
fn test_stock_route_table(#[case] path: &str, #[case] expected: Navigation) {
    let mut app = app();
    assert_eq!(app.navigate(path, ComponentData::new()).unwrap(), expected);
}

#[test]
fn test_unmatched_path_leaves_document_unchanged() {
    let mut app = app();
    app.navigate("/example/1", ComponentData::new()).unwrap();
    let before = app.main().inner_html();

    let outcome = app.navigate("/nowhere", ComponentData::new()).unwrap();
    assert_eq!(outcome, Navigation::Miss);
    assert_eq!(app.main().len(), 1);
    assert_eq!(app.main().inner_html(), before);
}

#[test]
fn test_another_example_appends_with_route_data() {
    let mut app = app();
    app.navigate("/example/1", ComponentData::new()).unwrap();
    app.navigate("/anotherexample", ComponentData::new()).unwrap();
    let outcome = app.navigate("/anotherexample", ComponentData::new()).unwrap();

    assert_eq!(outcome, Navigation::Mounted { route: 1 });
    assert_eq!(app.main().len(), 3);

    let widget = app.main().last().unwrap();
    assert!(matches!(widget, Widget::AnotherExample(_)));
    assert_eq!(widget.host().tag(), "another");
    assert_eq!(
        widget.host().inner_html(),
        "<h1>another example</h1><p>Jos</p>"
    );
}

#[test]
fn test_replace_clears_previous_children() {
    let mut app = app();
    app.navigate("/anotherexample", ComponentData::new()).unwrap();
    app.navigate("/anotherexample", ComponentData::new()).unwrap();
    assert_eq!(app.main().len(), 2);

    app.navigate("/login", ComponentData::new()).unwrap();
    assert_eq!(app.main().len(), 1);
    assert!(matches!(app.main().last(), Some(Widget::Login(_))));
}

#[test]
fn test_navigation_payload_reaches_component() {
    let mut app = app();
    app.navigate("/login", data(&[("username", "jos")])).unwrap();

    let widget = app.main().last().unwrap();
    assert_eq!(widget.component().get_str("username"), Some("jos"));
    assert_eq!(
        widget.host().inner_html(),
        r#"<form><input name="username" value="jos"></form>"#
    );
}

#[tokio::test]
async fn test_guarded_route_redirects_until_login() {
    let mut app = app();
    app.register(account_registration()).unwrap();

    let outcome = app.navigate("/account", ComponentData::new()).unwrap();
    assert_eq!(outcome, Navigation::RedirectedToLogin { route: 3 });
    assert!(matches!(app.main().last(), Some(Widget::Login(_))));

    app.gate()
        .login("jos", "123", &CancellationToken::new())
        .await
        .unwrap();

    let outcome = app.navigate("/account", ComponentData::new()).unwrap();
    assert_eq!(outcome, Navigation::Mounted { route: 3 });
    assert!(matches!(app.main().last(), Some(Widget::Plain(_))));
}

#[tokio::test]
async fn test_login_redirect_remembers_requested_path() {
    let mut app = app();
    app.templates_mut()
        .insert("login", r#"<form action="{uri}"><input name="username"></form>"#);
    app.register(account_registration()).unwrap();

    assert_eq!(app.resume().unwrap(), Navigation::Idle);

    app.navigate("/account", ComponentData::new()).unwrap();
    let login = app.main().last().unwrap();
    assert_eq!(login.component().get_str(REDIRECT_URI), Some("/account"));
    assert_eq!(
        login.host().inner_html(),
        r#"<form action="/account"><input name="username"></form>"#
    );
    assert_eq!(app.pending(), Some("/account"));

    // Still locked out: nothing to resume yet
    assert_eq!(app.resume().unwrap(), Navigation::Idle);
    assert_eq!(app.pending(), Some("/account"));

    app.gate()
        .login("jos", "123", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(app.resume().unwrap(), Navigation::Mounted { route: 3 });
    assert!(matches!(app.main().last(), Some(Widget::Plain(_))));
    assert_eq!(app.pending(), None);
}

#[test]
fn test_bootstrap_rejects_invalid_pattern() {
    let mut app = App::new(Config::default(), credentials());
    let broken = Registration::new("broken", |host, data, _: &Services| {
        Widget::from(Component::activate(host, data, "example"))
    })
    .route(RouteSpec::new("/fine"))
    .route(RouteSpec::new("/broken/(unclosed"));

    let err = app.bootstrap([broken]).unwrap_err();
    assert!(format!("{:#}", err).contains("broken"));
    assert!(app.router().is_empty());
    assert!(app.create("broken", ComponentData::new()).is_none());
}

#[test]
fn test_missing_template_is_reported() {
    let mut app = App::new(Config::default(), credentials());
    app.bootstrap(stock_registrations()).unwrap();

    let err = app.navigate("/example/1", ComponentData::new()).unwrap_err();
    assert!(matches!(err, ComponentError::TemplateNotFound(ref name) if name == "example"));
    assert!(app.main().is_empty());
}

#[tokio::test]
async fn test_created_login_component_logs_in() {
    let mut app = app();

    let widget = app
        .create("login", data(&[("username", "jos"), ("password", "123")]))
        .unwrap();
    widget
        .as_login()
        .unwrap()
        .login(&CancellationToken::new())
        .await
        .unwrap();
    assert!(app.gate().is_authenticated());

    app.mount(widget, MountMode::Append).unwrap();
    assert_eq!(app.main().len(), 1);
}

#[test]
fn test_create_uses_registered_tag() {
    let app = app();
    let widget = app.create("anotherexample", ComponentData::new()).unwrap();
    assert_eq!(widget.host().tag(), "another");
    assert!(app.create("unknown", ComponentData::new()).is_none());
}

#[test]
fn test_actions_on_mounted_widget() {
    let mut app = app();
    app.navigate("/example/7", data(&[("namekey", "Jos")])).unwrap();

    let widget = app.main().last().unwrap();
    assert!(widget.invoke("exampleAction").is_ok());
    let saved = widget.as_saveable().unwrap().save().unwrap();
    assert!(saved.contains(r#""namekey":"Jos""#));
}
