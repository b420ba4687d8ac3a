use std::fmt;

use serde::{Deserialize, Serialize};

/// Error body returned by the estimation backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorDetail {
    Message(String),
    /// Request body validation failures (HTTP 422).
    Issues(Vec<ApiValidationIssue>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationIssue {
    pub msg: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorDetail::Message(message) => f.write_str(message),
            ApiErrorDetail::Issues(issues) => {
                let joined = issues
                    .iter()
                    .map(|issue| issue.msg.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                f.write_str(&joined)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_detail() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"detail":"Lỗi khi dự đoán: boom"}"#).expect("decode");
        assert_eq!(body.detail.to_string(), "Lỗi khi dự đoán: boom");
    }

    #[test]
    fn decodes_validation_issue_list() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["body","bedrooms"],"msg":"field required","type":"missing"},{"loc":["body",0],"msg":"bad"}]}"#,
        )
        .expect("decode");
        assert_eq!(body.detail.to_string(), "field required; bad");
    }
}
