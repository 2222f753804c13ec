use anyhow::{anyhow, Context, Result};
use gridlogin::api::{create_router, RpcState};
use gridlogin::config::{load_config, new_runtime_config, GridLoginConfig};
use gridlogin::login::{Account, AccountDirectory, LoginService};
use gridlogin::udp::UdpEcho;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridlogin=info".into()),
        )
        .init();

    info!("Grid login starting...");

    let config = match std::env::var("GRIDLOGIN_CONFIG") {
        Ok(path) => {
            let config = load_config(&path)
                .map_err(|e| anyhow!("Failed to load config {}: {}", path, e))?;
            info!(path = %path, "Configuration loaded");
            config
        }
        Err(_) => {
            info!("GRIDLOGIN_CONFIG not set, using defaults");
            GridLoginConfig::default()
        }
    };

    let runtime_config = new_runtime_config();
    {
        let rc = runtime_config.read().unwrap_or_else(|e| e.into_inner());
        info!(
            logins_enabled = rc.logins_enabled,
            max_request_bytes = rc.max_request_bytes,
            "Runtime config"
        );
    }

    // Seed accounts from config
    let accounts = Arc::new(AccountDirectory::new());
    for entry in &config.accounts {
        let account = Account::new(&entry.first, &entry.last, &entry.passwd).disabled(entry.disabled);
        match accounts.register(account) {
            Ok(account) => info!(
                first = %account.first,
                last = %account.last,
                agent_id = %account.agent_id,
                created_at = %account.created_at.to_rfc3339(),
                "Account registered"
            ),
            Err(e) => warn!(first = %entry.first, last = %entry.last, error = %e, "Skipping account"),
        }
    }

    // UDP circuit endpoint
    let udp = UdpEcho::bind(&config.server.udp_bind)
        .await
        .with_context(|| format!("Failed to bind UDP {}", config.server.udp_bind))?;
    let (udp_shutdown, udp_signal) = oneshot::channel();
    let udp_handle = tokio::spawn(udp.run(udp_signal));

    // Login endpoint
    let login_service = Arc::new(LoginService::new(
        accounts,
        config.grid.clone(),
        runtime_config.clone(),
    ));
    let router = create_router(RpcState {
        login_service,
        runtime_config,
    });
    let listener = tokio::net::TcpListener::bind(&config.server.rpc_bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.rpc_bind))?;
    info!(addr = %config.server.rpc_bind, "Login endpoint listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Login server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    let _ = udp_shutdown.send(());
    match udp_handle.await {
        Ok(Ok(echoed)) => info!(echoed, "UDP endpoint stopped"),
        Ok(Err(e)) => warn!(error = %e, "UDP endpoint failed"),
        Err(e) => warn!(error = %e, "UDP task panicked"),
    }

    Ok(())
}
