use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use console_infrastructure::AppConfig;
use console_interfaces_cli::{dispatch, Cli};

use crate::context::AppContext;
use crate::logging::init_tracing;

pub async fn run(cli: Cli) -> Result<u8> {
    let config = AppConfig::load().await?;
    let _log_guard = init_tracing(&config)?;
    let context = AppContext::new(&config).await?;
    let state = context.state;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested");
        signal_cancel.cancel();
    });

    let command = cli.command.name();
    let mut print = |screen: console_interfaces_cli::Screen| {
        let text = screen.render();
        if !text.is_empty() {
            println!("{text}\n");
        }
    };
    let result = dispatch(&state, cli.command, cancel.clone(), &mut print).await;
    cancel.cancel();

    match result {
        Ok(()) => Ok(0),
        Err(err) => {
            warn!(command, error = %err, "command failed");
            eprintln!("error: {err}");
            Ok(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("ctrl-c handler unavailable: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("sigterm handler unavailable: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
