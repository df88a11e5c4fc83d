use super::error::AppError;
use crate::services::client::Payload;
use serde::{Deserialize, Serialize};

/// Body of `POST /report`, asking the gateway to generate an impact report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub company: String,
}

impl ReportRequest {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
        }
    }
}

impl Payload for ReportRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.company.trim().is_empty() {
            return Err(AppError::InvalidPayload(
                "company must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response of `GET /auth/csrf`.
#[derive(Debug, Clone, Deserialize)]
pub struct CsrfToken {
    pub csrf: String,
}
