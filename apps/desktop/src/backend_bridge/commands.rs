//! Backend commands queued from UI to backend worker.

use client_core::RequestTicket;
use shared::domain::PredictionRequest;

#[derive(Debug)]
pub enum BackendCommand {
    Predict {
        ticket: RequestTicket,
        request: PredictionRequest,
    },
    FetchDistricts,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Predict { .. } => "predict",
            BackendCommand::FetchDistricts => "fetch_districts",
        }
    }
}
