//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{PredictionForm, SubmitOutcome, TransportError};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err("UI command queue is full; please retry".to_string()),
        Err(TrySendError::Disconnected(_)) => Err(
            "Backend worker disconnected (possible startup/runtime failure); restart the session"
                .to_string(),
        ),
    }
}

/// Submits the form and hands a dispatched request to the worker. If the
/// worker cannot take it, the ticket is failed right away so the form does
/// not stay in `Loading`.
pub fn submit_prediction(
    form: &mut PredictionForm,
    cmd_tx: &Sender<BackendCommand>,
) -> SubmitOutcome {
    let outcome = form.submit();
    if let SubmitOutcome::Dispatched(pending) = &outcome {
        let cmd = BackendCommand::Predict {
            ticket: pending.ticket,
            request: pending.request.clone(),
        };
        if let Err(reason) = dispatch_backend_command(cmd_tx, cmd) {
            form.complete(pending.ticket, Err(TransportError::Backend(reason)));
        }
    }
    outcome
}
