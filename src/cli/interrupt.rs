//! Cleanup on Ctrl+C and SIGTERM.
//!
//! Scratch files are normally disposed of by their guards. A signal would
//! end the process without running destructors, so a watcher thread waits
//! for one, purges the scratch registry and exits with status 130.

use std::process;
use std::thread;

#[cfg(unix)]
use tokio::signal::unix;

use crate::cli::output;
use crate::core::services::scratch;

const INTERRUPTED_EXIT: i32 = 130;

/// Spawn the watcher. Failing to install it only costs a warning.
pub fn install() {
    let spawned = thread::Builder::new()
        .name("doublewrap-interrupt".into())
        .spawn(|| {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    output::warning(&format!("Interrupt cleanup unavailable: {e}"));
                    return;
                }
            };

            runtime.block_on(wait_for_signal());

            let purged = scratch::registry().purge_all();
            eprintln!();
            output::error(&format!(
                "Interrupted; removed {purged} temporary file(s)"
            ));
            process::exit(INTERRUPTED_EXIT);
        });

    if let Err(e) = spawned {
        output::warning(&format!("Interrupt cleanup unavailable: {e}"));
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
