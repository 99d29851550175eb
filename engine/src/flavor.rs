//! Boss-wave flavor text fetched off the simulation thread.

use std::{sync::Arc, thread};

use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;

/// Shown while a request is in flight and whenever one fails.
pub const BOSS_FLAVOR_FALLBACK: &str = "The earth trembles as a titan approaches!";

/// Shown when the collaborator answers with an empty text.
pub const BOSS_FLAVOR_EMPTY: &str = "A gargantuan shadow looms over the horizon...";

const CANNED_LINES: [&str; 4] = [
    "A colossus of ash and iron marches on the gate!",
    "The tides recoil as a leviathan crawls ashore!",
    "Mountains split to birth a stone behemoth!",
    "The sky darkens beneath the wings of a storm titan!",
];

/// Failures reported by a [`FlavorSource`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FlavorError {
    /// The collaborator could not be reached or refused the request.
    #[error("flavor source unavailable: {0}")]
    Unavailable(String),
    /// The worker thread could not be started.
    #[error("failed to spawn flavor worker: {0}")]
    Spawn(String),
}

/// External collaborator that narrates boss waves.
pub trait FlavorSource: Send + Sync + 'static {
    /// Produces a short announcement for the boss of `wave`. May block.
    fn request_boss_flavor(&self, wave: u32) -> Result<String, FlavorError>;
}

/// Offline flavor source cycling through built-in lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct CannedFlavor;

impl FlavorSource for CannedFlavor {
    fn request_boss_flavor(&self, wave: u32) -> Result<String, FlavorError> {
        let index = (wave / 5).saturating_sub(1) as usize % CANNED_LINES.len();
        Ok(CANNED_LINES[index].to_owned())
    }
}

/// Completed flavor request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlavorReply {
    /// Boss wave the text was requested for.
    pub wave: u32,
    /// Outcome reported by the source.
    pub outcome: Result<String, FlavorError>,
}

impl FlavorReply {
    /// Text to display, substituting the canned fallbacks for failures and
    /// empty answers.
    #[must_use]
    pub fn display_text(&self) -> &str {
        match &self.outcome {
            Ok(text) if text.trim().is_empty() => BOSS_FLAVOR_EMPTY,
            Ok(text) => text.trim(),
            Err(_) => BOSS_FLAVOR_FALLBACK,
        }
    }
}

/// Runs flavor requests on worker threads and collects their replies.
///
/// Requests are never cancelled; a late reply simply overwrites whatever the
/// caller displays.
pub struct FlavorDispatcher {
    source: Arc<dyn FlavorSource>,
    sender: Sender<FlavorReply>,
    receiver: Receiver<FlavorReply>,
}

impl FlavorDispatcher {
    /// Creates a dispatcher that forwards requests to `source`.
    #[must_use]
    pub fn new(source: Arc<dyn FlavorSource>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            source,
            sender,
            receiver,
        }
    }

    /// Starts a request for the boss of `wave` without waiting for it.
    pub fn request(&self, wave: u32) -> Result<(), FlavorError> {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let _ = thread::Builder::new()
            .name(format!("boss-flavor-{wave}"))
            .spawn(move || {
                let outcome = source.request_boss_flavor(wave);
                let _ = sender.send(FlavorReply { wave, outcome });
            })
            .map_err(|error| FlavorError::Spawn(error.to_string()))?;
        Ok(())
    }

    /// Returns every reply that has arrived so far, oldest first. Never blocks.
    pub fn poll(&self) -> Vec<FlavorReply> {
        self.receiver.try_iter().collect()
    }
}

impl std::fmt::Debug for FlavorDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlavorDispatcher")
            .field("pending_replies", &self.receiver.len())
            .finish_non_exhaustive()
    }
}
