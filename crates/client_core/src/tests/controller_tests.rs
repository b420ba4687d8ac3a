use super::*;
use tokio::sync::broadcast::error::TryRecvError;

fn estimate(value: f64) -> PredictionResult {
    PredictionResult {
        estimated_price_per_m2: value,
    }
}

fn dispatched(outcome: SubmitOutcome) -> PendingPrediction {
    match outcome {
        SubmitOutcome::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {other:?}"),
    }
}

fn drain(rx: &mut broadcast::Receiver<FormEvent>) -> Vec<FormEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) => return events,
            Err(err) => panic!("unexpected receive error: {err}"),
        }
    }
}

#[test]
fn starts_idle_with_initial_fields() {
    let form = PredictionForm::default();
    assert_eq!(form.state(), &LifecycleState::Idle);
    assert_eq!(form.fields(), &FormFields::initial());
    assert_eq!(form.in_flight(), None);
}

#[test]
fn missing_fields_reject_without_leaving_current_state() {
    let edits: [fn(&mut PredictionForm); 6] = [
        |form| form.set_latitude(None),
        |form| form.set_latitude(Some(0.0)),
        |form| form.set_longitude(None),
        |form| form.set_bedrooms(Some(0)),
        |form| form.set_bedrooms(None),
        |form| form.set_district(None),
    ];

    for edit in edits {
        let mut form = PredictionForm::default();
        edit(&mut form);
        let mut rx = form.subscribe();

        let outcome = form.submit();
        assert!(
            matches!(
                outcome,
                SubmitOutcome::Rejected(ValidationError::MissingField { .. })
            ),
            "unexpected outcome {outcome:?}"
        );
        assert_eq!(form.state(), &LifecycleState::Idle);
        assert_eq!(form.in_flight(), None);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], FormEvent::ValidationFailed(_)));
    }
}

#[test]
fn zero_latitude_scenario_is_rejected() {
    let mut form = PredictionForm::new(FormFields {
        latitude: Some(0.0),
        longitude: Some(106.66),
        bedrooms: Some(2),
        district: Some(District::Quan1),
    });

    assert_eq!(
        form.submit(),
        SubmitOutcome::Rejected(ValidationError::MissingField {
            field: FormField::Latitude
        })
    );
    assert_eq!(form.state(), &LifecycleState::Idle);
}

#[test]
fn valid_submit_enters_loading_with_current_fields() {
    let mut form = PredictionForm::default();
    form.set_bedrooms(Some(3));
    form.set_district(Some(District::GoVap));

    let pending = dispatched(form.submit());
    assert_eq!(pending.request.bedrooms, 3);
    assert_eq!(pending.request.district, District::GoVap);
    assert_eq!(form.state(), &LifecycleState::Loading);
    assert_eq!(form.in_flight(), Some(pending.ticket));
}

#[test]
fn success_stores_result_and_notifies() {
    let mut form = PredictionForm::default();
    let mut rx = form.subscribe();

    let pending = dispatched(form.submit());
    assert!(form.complete(pending.ticket, Ok(estimate(85432.7))));

    assert_eq!(form.state(), &LifecycleState::Success(estimate(85432.7)));
    assert_eq!(form.state().error(), None);
    assert_eq!(
        drain(&mut rx),
        vec![
            FormEvent::StateChanged(LifecycleState::Loading),
            FormEvent::StateChanged(LifecycleState::Success(estimate(85432.7))),
        ]
    );
}

#[test]
fn failure_uses_fixed_message_and_clears_result() {
    let mut form = PredictionForm::default();
    let first = dispatched(form.submit());
    form.complete(first.ticket, Ok(estimate(10.0)));

    let second = dispatched(form.submit());
    assert_eq!(form.state().result(), None);
    form.complete(
        second.ticket,
        Err(TransportError::Status {
            status: 500,
            detail: "Lỗi khi dự đoán: model not loaded".to_string(),
        }),
    );

    assert_eq!(
        form.state(),
        &LifecycleState::Failure("Lỗi khi dự đoán giá. Vui lòng thử lại.".to_string())
    );
    assert_eq!(form.state().result(), None);
}

#[test]
fn success_after_failure_clears_error() {
    let mut form = PredictionForm::default();
    let first = dispatched(form.submit());
    form.complete(first.ticket, Err(TransportError::Backend("down".to_string())));
    assert!(form.state().error().is_some());

    let second = dispatched(form.submit());
    assert_eq!(form.state().error(), None);
    form.complete(second.ticket, Ok(estimate(42.0)));
    assert_eq!(form.state().error(), None);
    assert_eq!(form.state().result(), Some(&estimate(42.0)));
}

#[test]
fn second_submit_while_loading_is_ignored() {
    let mut form = PredictionForm::default();
    let first = dispatched(form.submit());
    let mut rx = form.subscribe();

    assert_eq!(form.submit(), SubmitOutcome::AlreadyLoading);
    assert_eq!(form.submit(), SubmitOutcome::AlreadyLoading);
    assert!(drain(&mut rx).is_empty());
    assert_eq!(form.in_flight(), Some(first.ticket));

    assert!(form.complete(first.ticket, Ok(estimate(7.0))));
    assert_eq!(form.state(), &LifecycleState::Success(estimate(7.0)));
    assert_eq!(form.in_flight(), None);
}

#[test]
fn stale_and_duplicate_completions_are_dropped() {
    let mut form = PredictionForm::default();
    let first = dispatched(form.submit());
    assert!(form.complete(first.ticket, Ok(estimate(1.0))));

    // A duplicate completion for a finished request changes nothing.
    assert!(!form.complete(first.ticket, Err(TransportError::Backend("late".to_string()))));
    assert_eq!(form.state(), &LifecycleState::Success(estimate(1.0)));

    let second = dispatched(form.submit());
    assert!(second.ticket > first.ticket);
    assert!(!form.complete(first.ticket, Ok(estimate(99.0))));
    assert_eq!(form.state(), &LifecycleState::Loading);

    assert!(form.complete(second.ticket, Ok(estimate(2.0))));
    assert_eq!(form.state(), &LifecycleState::Success(estimate(2.0)));
}

#[test]
fn completion_without_submission_is_ignored() {
    let mut other = PredictionForm::default();
    let foreign = dispatched(other.submit());

    let mut form = PredictionForm::default();
    assert!(!form.complete(foreign.ticket, Ok(estimate(5.0))));
    assert_eq!(form.state(), &LifecycleState::Idle);
}

#[test]
fn field_edits_are_accepted_while_loading() {
    let mut form = PredictionForm::default();
    let pending = dispatched(form.submit());
    let mut rx = form.subscribe();

    form.set_latitude(Some(10.8));
    form.set_district(Some(District::BinhThanh));

    assert_eq!(form.state(), &LifecycleState::Loading);
    assert_eq!(form.fields().latitude, Some(10.8));
    assert_eq!(pending.request.latitude, 10.762622);
    assert_eq!(
        drain(&mut rx),
        vec![
            FormEvent::FieldChanged(FormField::Latitude),
            FormEvent::FieldChanged(FormField::District),
        ]
    );
}

#[test]
fn form_stays_usable_after_rejection() {
    let mut form = PredictionForm::default();
    form.set_longitude(None);
    assert!(matches!(form.submit(), SubmitOutcome::Rejected(_)));

    form.set_longitude(Some(106.7));
    let pending = dispatched(form.submit());
    assert_eq!(pending.request.longitude, 106.7);
}
