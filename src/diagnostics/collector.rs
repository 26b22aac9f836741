// SPDX-License-Identifier: MPL-2.0
//! Event collection.
//!
//! The engine only ever holds a [`DiagnosticsHandle`]. Events travel over a
//! bounded channel and land in the collector's history when the embedder
//! calls [`DiagnosticsCollector::collect`], so logging never waits on a reader.

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::{BufferCapacity, CircularBuffer, DiagnosticEvent, EngineEvent};

/// Events that may sit in the channel between two collections.
const CHANNEL_CAPACITY: usize = 256;

/// Sending side given to the engine.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    sender: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Records `kind`, silently dropping it when the channel is full or the
    /// collector is gone.
    pub fn log(&self, kind: EngineEvent) {
        let _ = self.try_log(kind);
    }

    /// Records `kind`, reporting why it could not be queued.
    ///
    /// # Errors
    ///
    /// Returns [`TrySendError::Full`] when 256 events are
    /// waiting for collection and [`TrySendError::Disconnected`] once the
    /// collector has been dropped.
    pub fn try_log(&self, kind: EngineEvent) -> Result<(), TrySendError<DiagnosticEvent>> {
        self.sender.try_send(DiagnosticEvent::new(kind))
    }
}

/// Owner of the event history.
pub struct DiagnosticsCollector {
    history: CircularBuffer<DiagnosticEvent>,
    receiver: Receiver<DiagnosticEvent>,
    sender: Sender<DiagnosticEvent>,
    started_at: DateTime<Utc>,
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        Self {
            history: CircularBuffer::new(capacity),
            receiver,
            sender,
            started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            sender: self.sender.clone(),
        }
    }

    /// Moves every queued event into the history. Returns how many arrived.
    pub fn collect(&mut self) -> usize {
        let mut arrived = 0;
        for event in self.receiver.try_iter() {
            self.history.push(event);
            arrived += 1;
        }
        arrived
    }

    /// Collected events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.history.iter()
    }

    /// Collected events recorded at or after `instant`.
    pub fn since(&self, instant: DateTime<Utc>) -> impl Iterator<Item = &DiagnosticEvent> {
        self.history
            .iter()
            .filter(move |event| event.timestamp >= instant)
    }

    /// Collects, then returns the kind of every event in the history.
    pub fn drain_kinds(&mut self) -> Vec<EngineEvent> {
        self.collect();
        self.history.iter().map(|event| event.kind.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Events lost because the history wrapped around.
    #[must_use]
    pub fn overwritten(&self) -> u64 {
        self.history.overwritten()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
