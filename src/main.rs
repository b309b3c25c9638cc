// src/main.rs

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use poi_mcp_server::{
    api::create_router,
    config::Config,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = create_router(state);

    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("HTTP server terminated")?;
    Ok(())
}

// --- MCP Server Logic ---
async fn run_mcp_server(state: AppState) -> anyhow::Result<()> {
    info!("🚀 Starting MCP server on stdin/stdout...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        let read = stdin
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
        if read == 0 {
            info!("EOF received, shutting down MCP server");
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!("Received: {}", line);

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => handle_mcp_request(request, state.clone()).await,
            Err(parse_error) => {
                error!("JSON parse error: {}", parse_error);
                Some(Response::error(
                    serde_json::Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", parse_error),
                ))
            }
        };

        if let Some(response) = response {
            let response_json =
                serde_json::to_string(&response).context("Failed to serialize response")?;
            debug!("Sending: {}", response_json);
            stdout
                .write_all(format!("{}\n", response_json).as_bytes())
                .await
                .context("Failed to write response")?;
            stdout.flush().await.context("Failed to flush stdout")?;
        }
    }

    info!("MCP server shutting down");
    Ok(())
}

// A panic anywhere, including inside a tool invocation, ends the process.
fn install_fatal_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        std::process::exit(101);
    }));
}

#[tokio::main]
async fn main() {
    // Initialize tracing. stdout carries the MCP channel, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poi_mcp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    install_fatal_panic_hook();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(endpoint = %config.api_endpoint, "Configuration loaded");

    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Failed to initialize upload client: {}", e);
            std::process::exit(1);
        }
    };

    // Check if running in MCP mode (stdin/stdout) or HTTP server mode
    let args: Vec<String> = env::args().collect();
    let result = if args.contains(&"--mcp".to_string()) || env::var("MCP_MODE").is_ok() {
        run_mcp_server(app_state).await
    } else {
        run_http_server(app_state).await
    };

    if let Err(e) = result {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}
