use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::domain::ports::directory::{LookupError, SubjectDirectory};

use super::PatientName;

/// Patient directory behind a PostgREST-style endpoint.
///
/// Each lookup is a single `GET {base}/patients?id=eq.{id}` selecting only the
/// name columns, authenticated with the project API key.
pub struct RestDirectory {
    base_url: String,
    client: reqwest::Client,
}

impl RestDirectory {
    /// The HTTP client times out after 5 seconds, connection included.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Unavailable` if the API key is not a valid header
    /// value or the HTTP client cannot be initialized.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| LookupError::Unavailable(format!("invalid API key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| LookupError::Unavailable(format!("invalid API key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .default_headers(headers)
            .build()
            .map_err(|e| LookupError::Unavailable(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/patients", self.base_url)
    }
}

#[async_trait]
impl SubjectDirectory for RestDirectory {
    async fn display_name(&self, subject_id: &str) -> Result<Option<String>, LookupError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("id", format!("eq.{subject_id}")),
                ("select", "first_name,last_name".to_owned()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Unavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
        parse_patient_rows(&body)
    }
}

/// Reads the first row of a `[{first_name, last_name}, ...]` response.
/// An empty array means the patient does not exist.
fn parse_patient_rows(body: &str) -> Result<Option<String>, LookupError> {
    let rows: Vec<PatientName> =
        serde_json::from_str(body).map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
    Ok(rows.first().and_then(PatientName::display_name))
}
