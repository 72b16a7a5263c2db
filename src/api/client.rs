use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    error::{ExportError, ExportResult},
    utils::time::{date_to_query_value, DateRange},
};

use super::{RawReport, ReportKind, ReportSource};

pub const DEFAULT_API_URL: &str = "https://www.rescuetime.com/anapi/data";

/// HTTP implementation of [ReportSource]. The key is passed as a query parameter on every
/// request, so this type intentionally doesn't implement `Debug`.
pub struct RescueTimeClient {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl RescueTimeClient {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ExportResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExportError::config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            key: key.into(),
        })
    }

    fn query(&self, kind: ReportKind, range: DateRange) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.key.clone()),
            ("format", "json".into()),
            ("perspective", "interval".into()),
            ("resolution_time", "hour".into()),
            ("restrict_begin", date_to_query_value(range.start())),
            ("restrict_end", date_to_query_value(range.end())),
            ("restrict_kind", kind.as_str().into()),
        ]
    }
}

#[async_trait]
impl ReportSource for RescueTimeClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_report(&self, kind: ReportKind, range: DateRange) -> ExportResult<RawReport> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query(kind, range))
            .send()
            .await
            .map_err(|source| ExportError::Network {
                kind: kind.as_str(),
                source,
            })?;

        let status = response.status();
        debug!("Received {status} for {kind} report");
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ExportError::Auth(format!(
                    "{kind} report request was refused with {status}"
                )));
            }
            s if !s.is_success() => {
                return Err(ExportError::Status {
                    kind: kind.as_str(),
                    status,
                });
            }
            _ => {}
        }

        let body = response.text().await.map_err(|source| ExportError::Network {
            kind: kind.as_str(),
            source,
        })?;

        parse_report_body(&body)
    }
}

/// The API answers a bad key with a regular response whose body is an object with an `error`
/// field, so that case is checked before parsing the table.
pub fn parse_report_body(body: &str) -> ExportResult<RawReport> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ExportError::schema(format!("response is not json: {e}")))?;

    if let Some(error) = value.get("error") {
        let message = value
            .get("messages")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .unwrap_or("unknown error")
            .trim_start_matches("# ")
            .to_string();
        return Err(ExportError::Auth(message));
    }

    serde_json::from_value(value).map_err(|e| ExportError::schema(e.to_string()))
}
