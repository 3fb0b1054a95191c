use anyhow::{Context, Result};

/// Wait for a termination request and return the name of the signal seen.
#[cfg(unix)]
pub async fn wait_for_shutdown() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).context("install SIGTERM handler")?;
    let mut int = signal(SignalKind::interrupt()).context("install SIGINT handler")?;

    let name = tokio::select! {
        _ = term.recv() => "SIGTERM",
        _ = int.recv() => "SIGINT",
    };
    tracing::info!(signal = name, "shutdown requested");
    Ok(name)
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("install Ctrl+C handler")?;
    tracing::info!(signal = "ctrl-c", "shutdown requested");
    Ok("ctrl-c")
}
