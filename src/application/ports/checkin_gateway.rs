use crate::domain::entities::CheckinConfirmation;
use crate::domain::value_objects::Barcode;
use async_trait::async_trait;
use thiserror::Error;

/// How a delivery attempt failed. The split decides what happens next:
/// a rejection is surfaced and never retried, a network failure is always
/// convertible into a queued retry.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The endpoint processed the request and declined it. The reason is
    /// the server-provided detail, shown to the operator verbatim.
    #[error("Check-in rejected: {reason}")]
    Rejected { reason: String },

    /// The request never got a well-formed answer: connection error,
    /// timeout, server-side outage, or an unreadable response body.
    #[error("Network failure: {0}")]
    Network(String),
}

/// The remote check-in endpoint.
#[async_trait]
pub trait CheckinGateway: Send + Sync {
    async fn deliver(&self, barcode: &Barcode) -> Result<CheckinConfirmation, DeliveryError>;
}
