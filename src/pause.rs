//! Process-wide pause switch.
//!
//! A single level-triggered flag flipped by the key listener and read by
//! the asset loop and the chunk writer. Waiters poll at a bounded interval
//! and are also woken directly on resume.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::messages::Messages;

/// Default bound on how long a paused waiter sleeps between checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct PauseState {
    paused: AtomicBool,
    resumed: Notify,
}

/// Shared handle to the pause flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct PauseController {
    state: Arc<PauseState>,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }

    /// Flip the flag and return the new state.
    pub fn toggle(&self) -> bool {
        let paused = !self.state.paused.fetch_xor(true, Ordering::SeqCst);
        if paused {
            tracing::info!("Download paused");
        } else {
            tracing::info!("Download resumed");
            self.state.resumed.notify_waiters();
        }
        paused
    }

    /// Block while paused. Returns whether any waiting happened.
    pub async fn wait_while_paused(&self, poll_interval: Duration) -> bool {
        let mut waited = false;
        loop {
            // Register for the wakeup before re-checking so a resume between
            // the check and the select is not lost.
            let resumed = self.state.resumed.notified();
            tokio::pin!(resumed);
            resumed.as_mut().enable();

            if !self.is_paused() {
                return waited;
            }
            waited = true;
            tokio::select! {
                _ = &mut resumed => {}
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
    }
}

/// Start the pause key listener on a blocking thread.
///
/// `p` toggles the flag and prints the localized notice. Does nothing when
/// stdin is not a terminal; the thread ends when the terminal read fails.
pub fn spawn_key_listener(pause: PauseController, messages: &'static Messages) {
    if !std::io::stdin().is_terminal() {
        tracing::debug!("stdin is not a terminal, pause key disabled");
        return;
    }

    let spawned = std::thread::Builder::new()
        .name("pause-key".into())
        .spawn(move || {
            let term = console::Term::stdout();
            loop {
                match term.read_key() {
                    Ok(key) if is_pause_key(&key) => {
                        let notice = if pause.toggle() {
                            messages.paused
                        } else {
                            messages.resumed
                        };
                        let _ = term.write_line(notice);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("pause key listener stopped: {}", e);
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        tracing::warn!("Could not start pause key listener: {}", e);
    }
}

fn is_pause_key(key: &console::Key) -> bool {
    matches!(key, console::Key::Char('p') | console::Key::Char('P'))
}
