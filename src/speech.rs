/*!
 * Text-to-speech playback.
 *
 * `SpeechEngine` exposes start, cancel and an end-of-playback callback.
 * `CommandSpeechEngine` plays text through a system program (`say`,
 * `espeak`, ...) and runs at most one utterance at a time: starting a new one
 * cancels the previous one, and a cancelled utterance never reports its end.
 */

use log::{debug, warn};
use parking_lot::Mutex;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::oneshot;

use crate::app_config::SpeechConfig;
use crate::errors::SpeechError;

/// Called once when an utterance finishes on its own
pub type SpeechEndCallback = Box<dyn FnOnce() + Send + 'static>;

/// Platform speech synthesis
pub trait SpeechEngine: Send + Sync {
    /// Start speaking `text`; `on_end` runs after natural completion only
    fn speak(&self, text: &str, on_end: SpeechEndCallback) -> Result<(), SpeechError>;

    /// Stop the current utterance, if any
    fn cancel(&self);
}

/// Speech engine running an external program that reads text on stdin
#[derive(Debug)]
pub struct CommandSpeechEngine {
    program: String,
    args: Vec<String>,
    active: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            active: Mutex::new(None),
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

impl SpeechEngine for CommandSpeechEngine {
    // Must be called from within a tokio runtime
    fn speak(&self, text: &str, on_end: SpeechEndCallback) -> Result<(), SpeechError> {
        self.cancel();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Spawn(format!("{}: {}", self.program, e)))?;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self.active.lock() = Some(cancel_tx);

        let text = text.to_string();
        let program = self.program.clone();
        let playback = async move {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes()).await?;
            }
            // stdin is closed here so the program sees end of input
            child.wait().await
        };

        tokio::spawn(async move {
            tokio::select! {
                result = playback => {
                    match result {
                        Ok(status) if !status.success() => warn!("{} exited with {}", program, status),
                        Err(e) => warn!("Speech playback failed: {}", e),
                        Ok(_) => debug!("Speech playback finished"),
                    }
                    on_end();
                }
                _ = cancel_rx => {
                    // Dropping the playback future kills the child
                    debug!("Speech playback cancelled");
                }
            }
        });

        Ok(())
    }

    fn cancel(&self) {
        if let Some(cancel) = self.active.lock().take() {
            let _ = cancel.send(());
        }
    }
}
