//! Presence checks over the editable form fields.

use std::fmt;

use shared::domain::{District, PredictionRequest};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Latitude,
    Longitude,
    Bedrooms,
    District,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Latitude => "latitude",
            FormField::Longitude => "longitude",
            FormField::Bedrooms => "bedrooms",
            FormField::District => "district",
        };
        f.write_str(name)
    }
}

/// Current values of the four inputs. `None` means the input is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: Option<u32>,
    pub district: Option<District>,
}

impl FormFields {
    pub const INITIAL_LATITUDE: f64 = 10.762622;
    pub const INITIAL_LONGITUDE: f64 = 106.660172;
    pub const INITIAL_BEDROOMS: u32 = 2;

    /// Values the form shows when it is first opened.
    pub fn initial() -> Self {
        Self {
            latitude: Some(Self::INITIAL_LATITUDE),
            longitude: Some(Self::INITIAL_LONGITUDE),
            bedrooms: Some(Self::INITIAL_BEDROOMS),
            district: Some(District::Quan1),
        }
    }
}

/// Builds a request from the current field values.
///
/// Zero and NaN count as missing, so a coordinate of exactly 0.0 cannot be
/// submitted. Ranges and district membership are not checked here.
pub fn validate(fields: &FormFields) -> Result<PredictionRequest, ValidationError> {
    let latitude = present_coordinate(fields.latitude).ok_or(missing(FormField::Latitude))?;
    let longitude = present_coordinate(fields.longitude).ok_or(missing(FormField::Longitude))?;
    let bedrooms = fields
        .bedrooms
        .filter(|count| *count != 0)
        .ok_or(missing(FormField::Bedrooms))?;
    let district = fields.district.ok_or(missing(FormField::District))?;

    Ok(PredictionRequest {
        latitude,
        longitude,
        bedrooms,
        district,
    })
}

fn present_coordinate(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn missing(field: FormField) -> ValidationError {
    ValidationError::MissingField { field }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_missing(fields: &FormFields, expected: FormField) {
        assert_eq!(
            validate(fields),
            Err(ValidationError::MissingField { field: expected })
        );
    }

    #[test]
    fn initial_fields_are_submittable() {
        let request = validate(&FormFields::initial()).expect("valid");
        assert_eq!(request.latitude, 10.762622);
        assert_eq!(request.longitude, 106.660172);
        assert_eq!(request.bedrooms, 2);
        assert_eq!(request.district, District::Quan1);
    }

    #[test]
    fn each_absent_field_is_reported() {
        let mut fields = FormFields::initial();
        fields.latitude = None;
        assert_missing(&fields, FormField::Latitude);

        let mut fields = FormFields::initial();
        fields.longitude = None;
        assert_missing(&fields, FormField::Longitude);

        let mut fields = FormFields::initial();
        fields.bedrooms = None;
        assert_missing(&fields, FormField::Bedrooms);

        let mut fields = FormFields::initial();
        fields.district = None;
        assert_missing(&fields, FormField::District);
    }

    #[test]
    fn zero_values_count_as_missing() {
        let mut fields = FormFields::initial();
        fields.latitude = Some(0.0);
        assert_missing(&fields, FormField::Latitude);

        let mut fields = FormFields::initial();
        fields.longitude = Some(-0.0);
        assert_missing(&fields, FormField::Longitude);

        let mut fields = FormFields::initial();
        fields.bedrooms = Some(0);
        assert_missing(&fields, FormField::Bedrooms);
    }

    #[test]
    fn nan_coordinate_counts_as_missing() {
        let mut fields = FormFields::initial();
        fields.longitude = Some(f64::NAN);
        assert_missing(&fields, FormField::Longitude);
    }

    #[test]
    fn first_missing_field_wins() {
        assert_missing(&FormFields::default(), FormField::Latitude);
    }

    #[test]
    fn no_range_checks_are_applied() {
        let fields = FormFields {
            latitude: Some(-91.0),
            longitude: Some(500.0),
            bedrooms: Some(42),
            district: Some(District::NhaBe),
        };
        let request = validate(&fields).expect("presence is all that is checked");
        assert_eq!(request.bedrooms, 42);
    }

    #[test]
    fn missing_field_has_localized_message() {
        let err = validate(&FormFields::default()).expect_err("empty form");
        assert_eq!(err.user_message(), "Vui lòng điền đầy đủ thông tin");
    }
}
