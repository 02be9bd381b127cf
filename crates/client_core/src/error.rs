use thiserror::Error;

pub const DEFAULT_SUBMISSION_MESSAGE: &str = "Failed to create booking. Please try again.";

/// Local, synchronous field problems. They block step advancement and are
/// shown in the wizard's error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid 10-digit US phone number")]
    InvalidPhone,
    #[error("Please enter a move date in YYYY-MM-DD format")]
    InvalidMoveDate,
    #[error("Move date cannot be in the past")]
    MoveDateInPast,
    #[error("Please choose a valid {field}")]
    InvalidOption { field: &'static str },
    #[error("Unknown form field '{0}'")]
    UnknownField(String),
    #[error("Please create the booking before continuing to payment")]
    BookingNotCreated,
}

/// Failures at the create-booking boundary. All of them leave the wizard on
/// the move-details step so the user can resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("A booking submission is already in progress")]
    InProgress,
    #[error("Failed to get booking ID from response")]
    MissingBookingId,
    #[error("{0}")]
    Backend(String),
}

impl SubmissionError {
    pub fn backend(err: &anyhow::Error) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::Backend(DEFAULT_SUBMISSION_MESSAGE.to_string())
        } else {
            Self::Backend(message)
        }
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("payment is not available before the booking is created")]
    PaymentNotReady,
    #[error("payment failed: {0}")]
    Payment(anyhow::Error),
    #[error("navigation failed: {0}")]
    Navigation(anyhow::Error),
}

pub type WizardResult<T> = std::result::Result<T, WizardError>;
