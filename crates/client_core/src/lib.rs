use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use shared::protocol::{CreateBookingRequest, PaymentRequest};

pub mod error;
pub mod http;
pub mod phone;
pub mod state;
pub mod validation;
pub mod wizard;

pub use error::{SubmissionError, ValidationError, WizardError, WizardResult};
pub use http::{HttpBookingService, HttpPaymentService};
pub use state::{CreatedBooking, DraftInput, SubmissionPlan, WizardState};
pub use wizard::{confirmation_path, BookingWizard, WizardEvent};

/// Backend operation that turns a mapped draft into a booking.
///
/// The raw response body is returned; the wizard locates the booking id in it.
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Value>;
}

/// Opaque deposit capture. Resolving `Ok` is the success callback.
#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn capture_deposit(&self, request: &PaymentRequest) -> Result<()>;
}

#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, path: &str) -> Result<()>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
