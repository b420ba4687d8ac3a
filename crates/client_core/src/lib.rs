use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{PredictionRequest, PredictionResult},
    error::ApiErrorBody,
    protocol::{DistrictsResponse, SimplePredictResponse, DISTRICTS_PATH, SIMPLE_PREDICT_PATH},
};
use tracing::debug;
use url::Url;

pub mod controller;
pub mod error;
pub mod format;
pub mod validation;

pub use controller::{
    FormEvent, PendingPrediction, PredictionForm, RequestTicket, SubmitOutcome,
};
pub use error::{FormatError, TransportError, ValidationError};
pub use validation::{validate, FormField, FormFields};

const ERROR_BODY_LOG_LIMIT: usize = 200;

/// Performs one price estimate call.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &PredictionRequest)
        -> Result<PredictionResult, TransportError>;
}

/// Stand-in used when no backend client could be built; every call fails.
pub struct MissingPredictionService {
    reason: String,
}

impl MissingPredictionService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PredictionService for MissingPredictionService {
    async fn predict(
        &self,
        _request: &PredictionRequest,
    ) -> Result<PredictionResult, TransportError> {
        Err(TransportError::Backend(self.reason.clone()))
    }
}

pub struct PredictionClient {
    http: Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, None)
    }

    /// `timeout` bounds each whole request; `None` leaves it to the transport.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let parsed = Url::parse(base_url.trim())?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full success body, including the backend's supplementary fields.
    pub async fn predict_detailed(
        &self,
        request: &PredictionRequest,
    ) -> Result<SimplePredictResponse, TransportError> {
        let body = self.post_prediction(request).await?;
        let decoded: SimplePredictResponse = serde_json::from_str(&body)?;

        debug!(
            estimate = decoded.estimated_price_per_m2,
            total = ?decoded.total_estimated_price,
            area = ?decoded.area,
            normalized_district = ?decoded.normalized_district,
            neighbours = ?decoded.nearest_properties_used,
            "received price estimate"
        );
        Ok(decoded)
    }

    async fn post_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<String, TransportError> {
        let url = format!("{}{}", self.base_url, SIMPLE_PREDICT_PATH);
        debug!(
            %url,
            district = %request.district,
            bedrooms = request.bedrooms,
            "requesting price estimate"
        );

        let res = self.http.post(&url).json(request).send().await?;
        read_success_body(res).await
    }

    /// Districts the backend model was trained on.
    pub async fn available_districts(&self) -> Result<Vec<String>, TransportError> {
        let url = format!("{}{}", self.base_url, DISTRICTS_PATH);
        debug!(%url, "requesting district list");

        let res = self.http.get(&url).send().await?;
        let body = read_success_body(res).await?;
        let decoded: DistrictsResponse = serde_json::from_str(&body)?;
        match (decoded.available_districts, decoded.error) {
            (_, Some(err)) => Err(TransportError::Backend(err)),
            (Some(districts), None) => Ok(districts),
            (None, None) => Err(TransportError::Backend(
                "district list missing from response".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, TransportError> {
        // Only the estimate is read; the supplementary fields never fail a call.
        let body = self.post_prediction(request).await?;
        let result: PredictionResult = serde_json::from_str(&body)?;
        debug!(estimate = result.estimated_price_per_m2, "received price estimate");
        Ok(result)
    }
}

async fn read_success_body(res: Response) -> Result<String, TransportError> {
    let status = res.status();
    let body = res.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    Err(TransportError::Status {
        status: status.as_u16(),
        detail: describe_error_body(&body),
    })
}

fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.detail.to_string(),
        Err(_) => body.chars().take(ERROR_BODY_LOG_LIMIT).collect(),
    }
}

/// Drives a [`PredictionForm`] against a [`PredictionService`] on the current task.
///
/// `submit` holds `&mut self` across the call, so a session never has more
/// than one request outstanding.
pub struct PredictionSession<S: PredictionService> {
    form: PredictionForm,
    service: S,
}

impl<S: PredictionService> PredictionSession<S> {
    pub fn new(form: PredictionForm, service: S) -> Self {
        Self { form, service }
    }

    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PredictionForm {
        &mut self.form
    }

    /// Dropping the returned future mid-call fails the in-flight ticket, so
    /// the form never stays in `Loading`.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.form.submit();
        if let SubmitOutcome::Dispatched(pending) = &outcome {
            let mut guard = InFlightGuard {
                form: &mut self.form,
                ticket: Some(pending.ticket),
            };
            let result = self.service.predict(&pending.request).await;
            guard.finish(result);
        }
        outcome
    }
}

struct InFlightGuard<'a> {
    form: &'a mut PredictionForm,
    ticket: Option<RequestTicket>,
}

impl InFlightGuard<'_> {
    fn finish(&mut self, result: Result<PredictionResult, TransportError>) {
        if let Some(ticket) = self.ticket.take() {
            self.form.complete(ticket, result);
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.finish(Err(TransportError::Backend(
            "prediction call abandoned before completion".to_string(),
        )));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
