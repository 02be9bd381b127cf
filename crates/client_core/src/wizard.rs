//! Async driver around [`WizardState`]: owns the collaborators, performs the
//! create-booking call and the payment hand-off, and broadcasts view events.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    domain::{BookingDraft, BookingId, WizardStep},
    protocol::{PaymentRequest, DEPOSIT_AMOUNT_CENTS},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    error::{ValidationError, WizardError, WizardResult},
    phone::format_phone_number,
    state::{DraftInput, SubmissionPlan, WizardState},
    validation::validate_draft_input,
    BookingService, Navigator, PaymentService,
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    StepChanged(WizardStep),
    ScrollToTop,
    ErrorShown(String),
    BookingCreated(BookingId),
    Navigated(String),
}

pub fn confirmation_path(booking_id: &BookingId) -> String {
    format!("/booking-confirmation/{booking_id}")
}

pub struct BookingWizard {
    state: Mutex<WizardState>,
    bookings: Arc<dyn BookingService>,
    payments: Arc<dyn PaymentService>,
    navigator: Arc<dyn Navigator>,
    deposit_cents: u64,
    events: broadcast::Sender<WizardEvent>,
}

impl BookingWizard {
    pub fn new(
        bookings: Arc<dyn BookingService>,
        payments: Arc<dyn PaymentService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(WizardState::new()),
            bookings,
            payments,
            navigator,
            deposit_cents: DEPOSIT_AMOUNT_CENTS,
            events,
        }
    }

    pub fn with_deposit_cents(mut self, deposit_cents: u64) -> Self {
        self.deposit_cents = deposit_cents;
        self
    }

    /// Starts from a pre-filled draft. Phone input is normalised as if typed.
    pub fn with_draft(mut self, mut draft: BookingDraft) -> Self {
        draft.phone = format_phone_number(&draft.phone);
        self.state = Mutex::new(WizardState::with_draft(draft));
        self
    }

    /// Like [`Self::with_draft`] for drafts loaded outside the form. The
    /// per-field input rules are applied up front since no field was typed.
    pub fn with_loaded_draft(
        self,
        draft: BookingDraft,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        validate_draft_input(&draft, today)?;
        Ok(self.with_draft(draft))
    }

    pub fn deposit_cents(&self) -> u64 {
        self.deposit_cents
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WizardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> WizardState {
        self.state.lock().await.clone()
    }

    pub async fn update(&self, input: DraftInput) {
        self.state.lock().await.update(input);
    }

    pub async fn update_form(
        &self,
        field: &str,
        raw: &str,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        let input = DraftInput::from_form(field, raw, today)?;
        self.update(input).await;
        Ok(())
    }

    pub async fn advance(&self) -> Result<WizardStep, ValidationError> {
        let outcome = self.state.lock().await.advance();
        match &outcome {
            Ok(step) => self.step_changed(*step),
            Err(err) => self.show_error(err.to_string()),
        }
        outcome
    }

    pub async fn retreat(&self) -> WizardStep {
        let step = self.state.lock().await.retreat();
        self.step_changed(step);
        step
    }

    /// Leaves the payment step for the move details. The created booking is
    /// kept and later edits are not re-synced to it.
    pub async fn back_to_edit(&self) -> WizardStep {
        self.retreat().await
    }

    /// Validates the move details, creates the booking and moves to payment.
    ///
    /// The state lock is released while the call is in flight; a second
    /// submission during that window is refused by the loading flag.
    pub async fn submit(&self) -> WizardResult<BookingId> {
        let plan = {
            let mut state = self.state.lock().await;
            match state.begin_submission() {
                Ok(plan) => plan,
                Err(err) => {
                    if let WizardError::Validation(invalid) = &err {
                        self.show_error(invalid.to_string());
                    }
                    return Err(err);
                }
            }
        };

        let request = match plan {
            SubmissionPlan::Create(request) => request,
            SubmissionPlan::AlreadyCreated(id) => {
                debug!(booking_id = %id, "booking already created; returning to payment");
                self.step_changed(WizardStep::Payment);
                return Ok(id);
            }
        };

        info!(
            move_date = %request.move_date,
            home_size = %request.home_size,
            "creating booking"
        );
        let response = self.bookings.create_booking(&request).await;
        let outcome = self.state.lock().await.finish_submission(request, response);

        match outcome {
            Ok(id) => {
                info!(booking_id = %id, "booking created");
                let _ = self.events.send(WizardEvent::BookingCreated(id.clone()));
                self.step_changed(WizardStep::Payment);
                Ok(id)
            }
            Err(err) => {
                error!(error = %err, "booking creation failed");
                self.show_error(err.to_string());
                Err(err.into())
            }
        }
    }

    pub async fn payment_request(&self) -> Option<PaymentRequest> {
        self.state.lock().await.payment_request(self.deposit_cents)
    }

    /// Hands the deposit to the payment component and, once it succeeds,
    /// navigates to the confirmation view. Returns the confirmation path.
    pub async fn pay(&self) -> WizardResult<String> {
        let request = self
            .payment_request()
            .await
            .ok_or(WizardError::PaymentNotReady)?;

        info!(
            booking_id = %request.booking_id,
            amount = request.amount,
            "capturing deposit"
        );
        if let Err(err) = self.payments.capture_deposit(&request).await {
            warn!(booking_id = %request.booking_id, error = %err, "deposit capture failed");
            return Err(WizardError::Payment(err));
        }

        self.payment_succeeded(&request.booking_id).await
    }

    async fn payment_succeeded(&self, booking_id: &BookingId) -> WizardResult<String> {
        let path = confirmation_path(booking_id);
        self.navigator
            .navigate(&path)
            .await
            .map_err(WizardError::Navigation)?;
        info!(%path, "navigated to confirmation");
        let _ = self.events.send(WizardEvent::Navigated(path.clone()));
        Ok(path)
    }

    fn step_changed(&self, step: WizardStep) {
        let _ = self.events.send(WizardEvent::StepChanged(step));
        let _ = self.events.send(WizardEvent::ScrollToTop);
    }

    fn show_error(&self, message: String) {
        let _ = self.events.send(WizardEvent::ErrorShown(message));
    }
}
