//! Taylor-Made web server binary

use clap::Parser;
use std::path::PathBuf;
use taylor_web::server::TaylorServerBuilder;
use taylor_web::{init_logging, WebConfig};
use tracing::{error, info};

/// Taylor-Made membership platform web server
#[derive(Parser)]
#[command(name = "taylor-web")]
#[command(about = "Sessions, dashboards and the JSON API of the Taylor-Made platform")]
#[command(version)]
struct Args {
    /// Server host to bind to [env: TAYLOR_HOST]
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on [env: TAYLOR_PORT]
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable development mode (session cookies without Secure)
    #[arg(long)]
    dev: bool,

    /// Upstream API base URL [env: TAYLOR_UPSTREAM_URL]
    #[arg(long)]
    upstream_url: Option<String>,

    /// Catalog snapshot written by `taylor import` [env: TAYLOR_CATALOG_PATH]
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Users seed file [env: TAYLOR_USERS_FILE]
    #[arg(long)]
    users: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Apply command line overrides on top of the environment
    fn apply(self, mut config: WebConfig) -> WebConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.dev {
            config.dev_mode = true;
        }
        if let Some(upstream_url) = self.upstream_url {
            config.upstream_url = upstream_url;
        }
        if let Some(catalog) = self.catalog {
            config.catalog_path = Some(catalog);
        }
        if let Some(users) = self.users {
            config.users_file = Some(users);
        }
        config
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.apply(WebConfig::from_env());
    info!("Server: http://{}", config.address());

    let server = match TaylorServerBuilder::new(config).build().await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
