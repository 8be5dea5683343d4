//! Output printer with format awareness.

use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokensync_sync::SyncEvent;

use crate::cli::OutputFormat;

/// Writes results to stdout: one JSON document per line, or plain text.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a value with appropriate formatting
    pub fn print<T>(&self, value: &T) -> io::Result<()>
    where
        T: Serialize + Display,
    {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut stdout, value)?;
                writeln!(stdout)
            }
            OutputFormat::Text => writeln!(stdout, "{value}"),
        }
    }

    /// Print one event.
    ///
    /// Text output leaves errors to the exit path, which prints them once
    /// with a hint.
    pub fn event(&self, event: &SyncEvent) -> io::Result<()> {
        if self.format == OutputFormat::Text && matches!(event, SyncEvent::Error { .. }) {
            return Ok(());
        }
        self.print(event)
    }

    /// Print events from `events` until the sender is dropped.
    pub fn spawn_event_printer(self, mut events: broadcast::Receiver<SyncEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let Err(e) = self.event(&event) {
                            tracing::warn!(error = %e, "failed to write event");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event printer fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
