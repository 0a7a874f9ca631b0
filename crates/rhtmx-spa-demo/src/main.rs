use anyhow::{bail, Context, Result};
use clap::Parser;
use rhtmx_spa::{
    data_from_json, stock_registrations, App, CancellationToken, ComponentData, Config,
    Navigation, StaticCredentials,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rhtmx-spa")]
#[command(version, about = "RHTMX SPA - drive component routes", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "rhtmx-spa.toml")]
    config: PathBuf,

    /// Log in before navigating, as `user:password`
    #[arg(short, long)]
    login: Option<String>,

    /// JSON object passed to every navigation
    #[arg(short, long)]
    data: Option<String>,

    /// Paths to navigate to, in order
    #[arg(default_value = "/example/1")]
    paths: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}, using defaults", e);
        Config::default()
    });

    let payload = match &cli.data {
        Some(raw) => parse_payload(raw)?,
        None => ComponentData::new(),
    };

    let credentials = Arc::new(StaticCredentials::from_config(&config.auth));
    let mut app = App::new(config, credentials);

    if let Err(e) = app.load_templates() {
        // Not fatal: routes still dispatch, rendering reports the missing template
        eprintln!("{:#}", e);
    }
    app.bootstrap(stock_registrations())?;
    app.ready();

    if let Some(login) = &cli.login {
        let Some((username, password)) = login.split_once(':') else {
            bail!("--login expects user:password");
        };
        let attempt = app
            .gate()
            .spawn_login(username, password, CancellationToken::new());
        if let Err(e) = attempt.await? {
            warn!(error = %e, "login failed");
        }
    }

    for path in &cli.paths {
        match app.navigate(path, payload.clone()) {
            Ok(Navigation::Miss) => println!("{} -> no route", path),
            Ok(Navigation::Mounted { route }) => println!("{} -> route {}", path, route),
            Ok(Navigation::RedirectedToLogin { route }) => {
                println!("{} -> route {} (login required)", path, route)
            }
            Ok(Navigation::Idle) => {}
            Err(e) => eprintln!("{} -> {}", path, e),
        }
    }

    info!(children = app.main().len(), "done");
    println!("{}", app.main().inner_html());
    Ok(())
}

/// Parses `--data`, which must be a JSON object
fn parse_payload(raw: &str) -> Result<ComponentData> {
    let json: serde_json::Value = serde_json::from_str(raw).context("--data is not valid JSON")?;
    if !json.is_object() {
        bail!("--data must be a JSON object, got {}", raw);
    }
    Ok(data_from_json(json))
}
