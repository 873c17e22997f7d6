use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{VoiceRelayConfig, api};

/// Full application: API routes behind permissive CORS and request tracing
pub fn router(state: api::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve until Ctrl-C / SIGTERM
pub async fn run(config: VoiceRelayConfig) -> Result<()> {
    let addr = config.socket_addr().await?;
    let state = api::AppState::new(&config)?;
    let app = router(state);

    #[cfg(feature = "tls")]
    if let Some(tls) = &config.server.tls {
        return serve_tls(addr, tls, app).await;
    }

    #[cfg(not(feature = "tls"))]
    if config.server.tls.is_some() {
        tracing::warn!("TLS configured but the `tls` feature is disabled, serving plain HTTP");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("VoiceRelay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Server error")?;

    tracing::info!("VoiceRelay stopped");
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(
    addr: std::net::SocketAddr,
    tls: &crate::config::TlsConfig,
    app: Router,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    // Both ring and aws-lc-rs end up enabled; pick one explicitly.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .with_context(|| {
            format!(
                "Failed to load TLS certificate {} / key {}",
                tls.cert_path.display(),
                tls.key_path.display()
            )
        })?;

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
    });

    tracing::info!("VoiceRelay listening on https://{}", addr);
    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .with_context(|| "Server error")?;

    tracing::info!("VoiceRelay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
