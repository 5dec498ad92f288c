//! Running a bot turn on a background thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::bot::{run_bot_turn_with, BotReport};
use crate::game::{GameState, Intelligence};

/// Shared flag asking a running bot turn to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Options for [`spawn_bot_turn`].
#[derive(Debug, Clone, Default)]
pub struct BotOptions {
    /// Pause after each kingdom so a viewer can follow along.
    pub delay: Option<Duration>,
    /// Receives a snapshot after each kingdom.
    pub preview: Option<Sender<GameState>>,
}

/// A bot turn running on its own thread.
#[derive(Debug)]
pub struct BotTurnHandle {
    cancel: CancelToken,
    handle: JoinHandle<(GameState, BotReport)>,
}

impl BotTurnHandle {
    /// Ask the turn to stop after the current kingdom.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The token shared with the worker.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the worker has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the turn and take back the state.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the worker panicked.
    pub fn join(self) -> thread::Result<(GameState, BotReport)> {
        self.handle.join()
    }
}

/// Play one bot turn on a dedicated thread.
///
/// The worker owns the state until [`BotTurnHandle::join`] hands it back,
/// so nothing else can mutate it meanwhile. Snapshots sent over
/// `options.preview` are independent copies; a closed receiver is ignored.
#[must_use]
pub fn spawn_bot_turn(
    mut state: GameState,
    intelligence: Intelligence,
    options: BotOptions,
) -> BotTurnHandle {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let handle = thread::spawn(move || {
        let report = run_bot_turn_with(&mut state, intelligence, &token, |snapshot| {
            if let Some(tx) = &options.preview {
                if tx.send(snapshot.clone()).is_err() {
                    tracing::debug!("bot.preview_closed");
                }
            }
            if let Some(delay) = options.delay {
                if !token.is_cancelled() {
                    thread::sleep(delay);
                }
            }
        });
        (state, report)
    });
    BotTurnHandle { cancel, handle }
}
