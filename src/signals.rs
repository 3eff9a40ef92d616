//! # OS termination signals.
//!
//! [`shutdown_signal`] completes when the process receives a termination
//! signal, so the table can treat Ctrl-C / `kill` exactly like a console
//! quit: publish the shutdown event, cancel the seats, drain with grace.
//!
//! Unix listens for `SIGINT`, `SIGTERM` and `SIGQUIT`; elsewhere only
//! Ctrl-C is available. Signal registration failures are treated as "no
//! signal will ever arrive" — the future stays pending and the other
//! shutdown paths (console quit, external cancel) remain in charge.

/// Completes when a termination signal is received.
///
/// Each call creates independent listeners.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let int = signal(SignalKind::interrupt());
    let term = signal(SignalKind::terminate());
    let quit = signal(SignalKind::quit());

    match (int, term, quit) {
        (Ok(mut int), Ok(mut term), Ok(mut quit)) => {
            tokio::select! {
                _ = int.recv() => {}
                _ = term.recv() => {}
                _ = quit.recv() => {}
            }
        }
        _ => std::future::pending::<()>().await,
    }
}

/// Completes when a termination signal is received.
///
/// Each call creates independent listeners.
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
