//! Runtime bridge between UI command queue and backend event intake.

use std::thread::{self, JoinHandle};

use client_core::{MissingPredictionService, PredictionClient, PredictionService};
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    config::Settings,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

/// Starts the worker. It runs until `cmd_rx` disconnects or the UI side
/// stops listening.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Settings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                fail_all_predictions(&cmd_rx, &ui_tx);
                return;
            }
        };

        runtime.block_on(async move {
            let client = match PredictionClient::with_timeout(
                &settings.api_base_url,
                settings.request_timeout(),
            ) {
                Ok(client) => {
                    tracing::info!(api = client.base_url(), "backend worker ready");
                    let _ = ui_tx.try_send(UiEvent::Info(format!(
                        "Backend worker ready ({})",
                        client.base_url()
                    )));
                    Some(client)
                }
                Err(err) => {
                    tracing::error!("failed to build prediction client: {err}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    None
                }
            };
            let fallback = MissingPredictionService::new("prediction client failed to start");
            let service: &dyn PredictionService = match &client {
                Some(client) => client,
                None => &fallback,
            };

            while let Ok(cmd) = cmd_rx.recv() {
                let event = match cmd {
                    BackendCommand::Predict { ticket, request } => {
                        let outcome = service.predict(&request).await;
                        UiEvent::PredictionCompleted { ticket, outcome }
                    }
                    BackendCommand::FetchDistricts => match &client {
                        Some(client) => match client.available_districts().await {
                            Ok(districts) => UiEvent::DistrictsLoaded(districts),
                            Err(err) => UiEvent::Error(UiError::from_message(
                                UiErrorContext::Districts,
                                err.to_string(),
                            )),
                        },
                        None => UiEvent::Error(UiError::from_message(
                            UiErrorContext::Districts,
                            "backend unavailable: prediction client failed to start",
                        )),
                    },
                };

                // Completions must not be dropped, so wait for queue space.
                if ui_tx.send(event).is_err() {
                    break;
                }
            }
        });
    })
}

fn fail_all_predictions(cmd_rx: &Receiver<BackendCommand>, ui_tx: &Sender<UiEvent>) {
    let fallback = "backend unavailable: worker runtime failed to start";
    while let Ok(cmd) = cmd_rx.recv() {
        let event = match cmd {
            BackendCommand::Predict { ticket, .. } => UiEvent::PredictionCompleted {
                ticket,
                outcome: Err(client_core::TransportError::Backend(fallback.to_string())),
            },
            BackendCommand::FetchDistricts => UiEvent::Error(UiError::from_message(
                UiErrorContext::Districts,
                fallback,
            )),
        };
        if ui_tx.send(event).is_err() {
            break;
        }
    }
}
