//! Lifecycle notifications emitted by the controller.

use bevy::prelude::Message;

use super::error::MeasureError;
use super::result::MeasurementKind;
use super::session::LiveReading;
use super::tools::Tool;

#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    Started(Tool),
    PointAdded { reading: LiveReading },
    PointRemoved,
    Reset,
    Finished { kind: MeasurementKind, text: String },
    Cancelled(Tool),
    /// A route stop is waiting for "add as middle" or "add as last"
    ChoiceRequired { name: String },
    Rejected(MeasureError),
    Notice(String),
}

impl ToolEvent {
    /// Text for a toast, if the event deserves one
    pub fn toast_text(&self) -> Option<String> {
        match self {
            ToolEvent::Finished { text, .. } => Some(format!("Saved: {text}")),
            ToolEvent::Rejected(MeasureError::StaleAsyncResult) => None,
            ToolEvent::Rejected(err) => Some(err.to_string()),
            ToolEvent::Notice(text) => Some(text.clone()),
            _ => None,
        }
    }
}

/// Controller events forwarded to the rest of the app
#[derive(Message, Debug, Clone)]
pub struct ToolEventMessage(pub ToolEvent);
