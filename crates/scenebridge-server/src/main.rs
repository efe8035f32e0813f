//! Scenebridge headless server — entry point.
//!
//! This binary runs the editor automation bridge against the in-memory demo
//! workspace instead of a live editor.  Clients connect over TCP, send
//! newline-delimited JSON requests and receive correlated responses plus
//! broadcast events, exactly the traffic an embedded editor plugin would
//! produce.
//!
//! # Usage
//!
//! ```text
//! scenebridge [OPTIONS]
//!
//! Options:
//!   --port   <PORT>   TCP listener port [default: 9876]
//!   --bind   <ADDR>   Bind address [default: 127.0.0.1]
//!   --config <PATH>   TOML config file [default: scenebridge.toml]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                 | Default            | Description              |
//! |--------------------------|--------------------|--------------------------|
//! | `SCENEBRIDGE_PORT`       | `9876`             | TCP listener port        |
//! | `SCENEBRIDGE_BIND`       | `127.0.0.1`        | Bind address             |
//! | `SCENEBRIDGE_CONFIG`     | `scenebridge.toml` | Config file path         |
//!
//! In an embedded deployment the host editor calls `on_tick()` from its own
//! frame loop; headless, this binary supplies the loop itself at roughly
//! 60 Hz.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scenebridge_core::CommandRegistry;
use scenebridge_server::server::DEFAULT_PORT;
use scenebridge_server::{commands, BridgeConfig, BridgeServer, EditorWorkspace};

/// How often the headless loop ticks the server.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Editor automation bridge: newline-delimited JSON commands over TCP.
#[derive(Debug, Parser)]
#[command(
    name = "scenebridge",
    about = "Tick-driven TCP bridge exposing editor commands as JSON over TCP",
    version
)]
struct Cli {
    /// TCP port to listen on.  Overrides the config file.
    #[arg(long, env = "SCENEBRIDGE_PORT")]
    port: Option<u16>,

    /// IP address to bind the listener to.  Overrides the config file.
    ///
    /// Use `0.0.0.0` to accept connections from any interface, or
    /// `127.0.0.1` to accept only local clients.
    #[arg(long, env = "SCENEBRIDGE_BIND")]
    bind: Option<IpAddr>,

    /// TOML configuration file.  A missing file falls back to defaults.
    #[arg(long, default_value = "scenebridge.toml", env = "SCENEBRIDGE_CONFIG")]
    config: PathBuf,
}

impl Cli {
    /// Loads the config file and applies CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file exists but cannot be read or
    /// parsed.
    fn into_config(self) -> anyhow::Result<BridgeConfig> {
        let mut config = BridgeConfig::load_or_default(&self.config)
            .with_context(|| format!("loading config from {}", self.config.display()))?;
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // `RUST_LOG` wins; otherwise the config file's log level applies.
    let cli = Cli::parse();
    let config = cli.into_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let mut workspace = EditorWorkspace::with_error_cap(
        &config.workspace.project_root,
        config.workspace.max_captured_errors,
    )
    .with_context(|| {
        format!(
            "creating project root at {}",
            config.workspace.project_root.display()
        )
    })?;

    let mut registry = CommandRegistry::new();
    commands::register_all(&mut registry);
    info!(commands = registry.len(), "command surface registered");

    let (mut server, notifications) =
        BridgeServer::with_bind_address(registry, config.server.bind_address);
    let port = if config.server.port == 0 {
        DEFAULT_PORT
    } else {
        config.server.port
    };
    server
        .start(port)
        .with_context(|| format!("starting bridge on port {port}"))?;

    info!(
        addr = %format!("{}:{}", config.server.bind_address, port),
        project = %config.workspace.project_root.display(),
        "scenebridge listening"
    );

    // Embedded, the host editor calls on_tick() from its frame loop.
    // Headless we supply the loop ourselves and run until killed.
    loop {
        server.on_tick(&mut workspace);
        for notification in notifications.try_iter() {
            debug!(?notification, "server notification");
        }
        std::thread::sleep(TICK_INTERVAL);
    }
}
