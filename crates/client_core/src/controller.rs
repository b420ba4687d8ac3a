//! Form state holder and the submission lifecycle state machine.
//!
//! A [`PredictionForm`] is owned by a single thread. `submit()` hands back the
//! request to send; whoever performs the call reports back through
//! `complete()` on the owning thread. While a request is in flight further
//! submissions are ignored, and completions carrying any ticket other than the
//! in-flight one are dropped.

use shared::domain::{District, LifecycleState, PredictionRequest, PredictionResult};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    error::{TransportError, ValidationError, PREDICTION_FAILED_MESSAGE},
    validation::{validate, FormField, FormFields},
};

const EVENT_CAPACITY: usize = 64;

/// Identifies one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingPrediction {
    pub ticket: RequestTicket,
    pub request: PredictionRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The form entered `Loading`; the caller must send `request` and report
    /// the result with the same ticket.
    Dispatched(PendingPrediction),
    Rejected(ValidationError),
    AlreadyLoading,
}

/// Notifications sent to subscribers after every change.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged(FormField),
    StateChanged(LifecycleState),
    ValidationFailed(ValidationError),
}

pub struct PredictionForm {
    fields: FormFields,
    state: LifecycleState,
    in_flight: Option<RequestTicket>,
    next_ticket: u64,
    events: broadcast::Sender<FormEvent>,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self::new(FormFields::initial())
    }
}

impl PredictionForm {
    pub fn new(fields: FormFields) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            fields,
            state: LifecycleState::Idle,
            in_flight: None,
            next_ticket: 1,
            events,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn in_flight(&self) -> Option<RequestTicket> {
        self.in_flight
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn set_latitude(&mut self, latitude: Option<f64>) {
        self.fields.latitude = latitude;
        self.notify(FormEvent::FieldChanged(FormField::Latitude));
    }

    pub fn set_longitude(&mut self, longitude: Option<f64>) {
        self.fields.longitude = longitude;
        self.notify(FormEvent::FieldChanged(FormField::Longitude));
    }

    pub fn set_bedrooms(&mut self, bedrooms: Option<u32>) {
        self.fields.bedrooms = bedrooms;
        self.notify(FormEvent::FieldChanged(FormField::Bedrooms));
    }

    pub fn set_district(&mut self, district: Option<District>) {
        self.fields.district = district;
        self.notify(FormEvent::FieldChanged(FormField::District));
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if let Some(ticket) = self.in_flight {
            debug!(ticket = ticket.0, "submission ignored while a prediction is loading");
            return SubmitOutcome::AlreadyLoading;
        }

        let request = match validate(&self.fields) {
            Ok(request) => request,
            Err(err) => {
                debug!(%err, "submission rejected by validation");
                self.notify(FormEvent::ValidationFailed(err));
                return SubmitOutcome::Rejected(err);
            }
        };

        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.transition(LifecycleState::Loading);
        debug!(ticket = ticket.0, district = %request.district, "prediction dispatched");

        SubmitOutcome::Dispatched(PendingPrediction { ticket, request })
    }

    /// Applies the outcome of the call issued for `ticket`. Returns `false`
    /// when the ticket is not the one in flight and nothing changed.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<PredictionResult, TransportError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            warn!(
                ticket = ticket.0,
                in_flight = ?self.in_flight.map(RequestTicket::value),
                "dropping completion for a request that is not in flight"
            );
            return false;
        }
        self.in_flight = None;

        let next = match outcome {
            Ok(result) => LifecycleState::Success(result),
            Err(err) => {
                warn!(ticket = ticket.0, error = %err, "prediction request failed");
                LifecycleState::Failure(PREDICTION_FAILED_MESSAGE.to_string())
            }
        };
        self.transition(next);
        true
    }

    fn transition(&mut self, next: LifecycleState) {
        self.state = next;
        self.notify(FormEvent::StateChanged(self.state.clone()));
    }

    fn notify(&self, event: FormEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
