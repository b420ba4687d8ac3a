//! Plain-text rendering of form fields, lifecycle state and notifications.

use client_core::{
    format::{display_price, PRICE_DISCLAIMER},
    FormEvent, FormFields,
};
use shared::domain::{District, LifecycleState};
use tokio::sync::broadcast::{self, error::TryRecvError};

pub fn describe_fields(fields: &FormFields) -> String {
    fn or_blank<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "(trống)".to_string(), |v| v.to_string())
    }

    [
        format!("📍 Vĩ độ (Latitude):    {}", or_blank(fields.latitude)),
        format!("📍 Kinh độ (Longitude): {}", or_blank(fields.longitude)),
        format!("🛏️ Số phòng ngủ:        {}", or_blank(fields.bedrooms)),
        format!("🏘️ Quận/Huyện:          {}", or_blank(fields.district)),
    ]
    .join("\n")
}

/// `None` for `Idle`, which has nothing to show.
pub fn describe_state(state: &LifecycleState) -> Option<String> {
    match state {
        LifecycleState::Idle => None,
        LifecycleState::Loading => Some("🔄 Đang dự đoán...".to_string()),
        LifecycleState::Success(result) => Some(format!(
            "📊 Kết quả dự đoán: {}\n{PRICE_DISCLAIMER}",
            display_price(result.estimated_price_per_m2)
        )),
        LifecycleState::Failure(message) => Some(format!("⚠️ {message}")),
    }
}

pub fn describe_event(event: &FormEvent) -> Option<String> {
    match event {
        FormEvent::FieldChanged(_) => None,
        FormEvent::StateChanged(state) => describe_state(state),
        FormEvent::ValidationFailed(err) => Some(format!("⚠️ {}", err.user_message())),
    }
}

pub fn describe_local_districts() -> String {
    District::ALL
        .iter()
        .enumerate()
        .map(|(idx, district)| format!("{:>2}. {district}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders every notification queued since the last call.
pub fn drain_notifications(events: &mut broadcast::Receiver<FormEvent>) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let FormEvent::StateChanged(state) = &event {
                    tracing::info!(?state, "form state changed");
                }
                lines.extend(describe_event(&event));
            }
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "form notifications lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{PredictionForm, SubmitOutcome};
    use shared::domain::PredictionResult;

    #[test]
    fn renders_success_with_grouped_price_and_disclaimer() {
        let text = describe_state(&LifecycleState::Success(PredictionResult {
            estimated_price_per_m2: 85432.7,
        }))
        .expect("text");
        assert_eq!(
            text,
            "📊 Kết quả dự đoán: 85.433 triệu VNĐ/m²\n* Giá dự đoán chỉ mang tính tham khảo"
        );
    }

    #[test]
    fn renders_placeholder_for_non_finite_price() {
        let text = describe_state(&LifecycleState::Success(PredictionResult {
            estimated_price_per_m2: f64::NAN,
        }))
        .expect("text");
        assert!(text.starts_with("📊 Kết quả dự đoán: --\n"));
    }

    #[test]
    fn idle_renders_nothing() {
        assert_eq!(describe_state(&LifecycleState::Idle), None);
    }

    #[test]
    fn blank_fields_are_marked() {
        let text = describe_fields(&FormFields {
            latitude: Some(10.5),
            ..FormFields::default()
        });
        assert!(text.contains("10.5"));
        assert_eq!(text.matches("(trống)").count(), 3);
    }

    #[test]
    fn local_district_listing_is_numbered() {
        let listing = describe_local_districts();
        assert!(listing.starts_with(" 1. Quận 1\n"));
        assert!(listing.ends_with("20. Huyện Nhà Bè"));
    }

    #[test]
    fn drains_notifications_in_order() {
        let mut form = PredictionForm::default();
        let mut events = form.subscribe();

        form.set_bedrooms(None);
        form.submit();
        form.set_bedrooms(Some(3));
        let SubmitOutcome::Dispatched(pending) = form.submit() else {
            panic!("expected dispatch");
        };
        form.complete(
            pending.ticket,
            Ok(PredictionResult {
                estimated_price_per_m2: 1_000_000.0,
            }),
        );

        assert_eq!(
            drain_notifications(&mut events),
            vec![
                "⚠️ Vui lòng điền đầy đủ thông tin".to_string(),
                "🔄 Đang dự đoán...".to_string(),
                "📊 Kết quả dự đoán: 1.000.000 triệu VNĐ/m²\n* Giá dự đoán chỉ mang tính tham khảo"
                    .to_string(),
            ]
        );
        assert!(drain_notifications(&mut events).is_empty());
    }
}
