//! Applies worker events on the thread that owns the form.

use client_core::PredictionForm;

use crate::controller::events::UiEvent;

/// Feeds `event` into the form. Completions surface through the form's own
/// notifications; everything else comes back as a line to print.
pub fn apply_ui_event(form: &mut PredictionForm, event: UiEvent) -> Option<String> {
    match event {
        UiEvent::PredictionCompleted { ticket, outcome } => {
            if !form.complete(ticket, outcome) {
                tracing::debug!(ticket = ticket.value(), "ignored completion for stale ticket");
            }
            None
        }
        UiEvent::DistrictsLoaded(districts) => {
            let mut lines = vec![format!("Backend supports {} districts:", districts.len())];
            lines.extend(districts.iter().map(|name| format!("  - {name}")));
            Some(lines.join("\n"))
        }
        UiEvent::Info(message) => Some(message),
        UiEvent::Error(err) => {
            tracing::warn!(
                context = ?err.context(),
                message = err.message(),
                "backend worker error"
            );
            Some(format!("⚠️ {}", err.summary()))
        }
    }
}
