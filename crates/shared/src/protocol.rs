use serde::{Deserialize, Serialize};

use crate::domain::PredictionResult;

pub const SIMPLE_PREDICT_PATH: &str = "/api/simple-predict-price";
pub const DISTRICTS_PATH: &str = "/api/districts";

/// Success body of `POST /api/simple-predict-price`.
///
/// Only `estimated_price_per_m2` is required; the rest describes how the
/// backend filled in the attributes the simple form does not ask for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplePredictResponse {
    pub estimated_price_per_m2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_estimated_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_properties_used: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_parameters_used: Option<AverageParameters>,
}

/// Neighbourhood averages the backend substituted for attributes the form
/// does not collect. Values are means, so counts may arrive as floats, and
/// any of them may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AverageParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_built: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_floors: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_score: Option<f64>,
}

impl From<&SimplePredictResponse> for PredictionResult {
    fn from(value: &SimplePredictResponse) -> Self {
        Self {
            estimated_price_per_m2: value.estimated_price_per_m2,
        }
    }
}

/// Body of `GET /api/districts`. The backend answers 200 with `error` set
/// when its encoder is not loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_districts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
