//! Backend-to-UI events and error modeling for the terminal controller.

use client_core::{RequestTicket, TransportError};
use shared::domain::PredictionResult;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    PredictionCompleted {
        ticket: RequestTicket,
        outcome: Result<PredictionResult, TransportError>,
    },
    DistrictsLoaded(Vec<String>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Districts,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("request failed")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
            || message_lower.contains("invalid backend url")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("http ")
            || message_lower.contains("backend unavailable")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Backend
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line hint for the terminal.
    pub fn summary(&self) -> String {
        let what = match self.context() {
            UiErrorContext::BackendStartup => "Backend worker startup failure",
            UiErrorContext::Districts => "Could not load remote district list",
        };
        match self.category() {
            UiErrorCategory::Transport => {
                format!("{what}: server unreachable; check the API URL/network and retry")
            }
            UiErrorCategory::Backend | UiErrorCategory::Unknown => {
                format!("{what}: {}", self.message())
            }
        }
    }
}
