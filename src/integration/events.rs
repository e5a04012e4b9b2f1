//! Track lifecycle records for external persistence.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Created,
    Removed,
}

/// One lifecycle event of one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: u64,
    /// Identifier of the video source the track was seen in.
    pub source: String,
    #[serde(rename = "type")]
    pub kind: ActionKind,
}

/// Fire-and-forget destination for [`Action`]s.
///
/// The pipeline logs a failed insert and moves on; it never retries.
pub trait ActionSink {
    fn insert(&mut self, action: &Action) -> Result<()>;
}

/// Keeps every action in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    actions: Vec<Action>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

impl ActionSink for MemorySink {
    fn insert(&mut self, action: &Action) -> Result<()> {
        self.actions.push(action.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ActionSink for JsonLinesSink<W> {
    fn insert(&mut self, action: &Action) -> Result<()> {
        serde_json::to_writer(&mut self.writer, action).map_err(|e| Error::Sink(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| Error::Sink(e.to_string()))
    }
}
