use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::{CheckinGateway, DeliveryError};
use crate::domain::entities::CheckinConfirmation;
use crate::domain::value_objects::Barcode;
use crate::infrastructure::api::response::{CheckinResponseBody, ErrorBody};
use crate::shared::error::{AppError, Result};

#[derive(Debug, Serialize)]
struct CheckinRequest<'a> {
    barcode: &'a str,
}

/// HTTP adapter for the remote check-in endpoint.
pub struct HttpCheckinGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCheckinGateway {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| AppError::Configuration(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CheckinGateway for HttpCheckinGateway {
    async fn deliver(
        &self,
        barcode: &Barcode,
    ) -> std::result::Result<CheckinConfirmation, DeliveryError> {
        let url = format!("{}/checkin-by-barcode", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CheckinRequest {
                barcode: barcode.as_str(),
            })
            .send()
            .await
            .map_err(|err| DeliveryError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: CheckinResponseBody = response
                .json()
                .await
                .map_err(|err| DeliveryError::Network(format!("unreadable response: {err}")))?;

            // A malformed success body is treated as transient: the scan must
            // not be dropped on the strength of a body we could not read.
            body.into_confirmation().map_err(DeliveryError::Network)
        } else if status.is_server_error() {
            Err(DeliveryError::Network(format!(
                "check-in endpoint answered HTTP {status}"
            )))
        } else {
            let reason = match response.json::<ErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => format!("check-in failed with HTTP {status}"),
            };
            Err(DeliveryError::Rejected { reason })
        }
    }
}
