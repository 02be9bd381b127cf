//! Pure state machine for the booking wizard. No I/O.
//!
//! Flow: contact → move details → (booking created) → payment.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;
use shared::{
    domain::{Bedrooms, BookingDraft, BookingId, MoveTime, MoveType, WizardStep},
    protocol::{extract_booking_id, normalize_email, CreateBookingRequest, PaymentRequest},
};

use crate::{
    error::{SubmissionError, ValidationError, WizardError},
    phone::format_phone_number,
    validation::{parse_move_date, validate_contact, validate_move_details, validate_step},
};

/// A single edit of one draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftInput {
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
    MoveDate(Option<NaiveDate>),
    MoveTime(MoveTime),
    MoveType(MoveType),
    Bedrooms(Bedrooms),
    PickupAddress(String),
    DropoffAddress(String),
    NeedPackingHelp(bool),
    NeedBoxesSupplied(bool),
    AnyStairs(bool),
    SpecialItems(String),
}

impl DraftInput {
    /// Builds an edit from a form field name and its raw text value.
    ///
    /// Field names are the camelCase names used by the booking form. Dates
    /// before `today` are refused the same way the date picker refuses them.
    pub fn from_form(field: &str, raw: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let text = raw.to_string();
        let input = match field {
            "firstName" => Self::FirstName(text),
            "lastName" => Self::LastName(text),
            "email" => Self::Email(text),
            "phone" => Self::Phone(text),
            "moveDate" if raw.trim().is_empty() => Self::MoveDate(None),
            "moveDate" => Self::MoveDate(Some(parse_move_date(raw, today)?)),
            "moveTime" => Self::MoveTime(parse_option(raw, "move time")?),
            "moveType" => Self::MoveType(parse_option(raw, "move type")?),
            "bedrooms" => Self::Bedrooms(parse_option(raw, "bedroom count")?),
            "pickupAddress" => Self::PickupAddress(text),
            "dropoffAddress" => Self::DropoffAddress(text),
            "needPackingHelp" => Self::NeedPackingHelp(parse_checkbox(raw)),
            "needBoxesSupplied" => Self::NeedBoxesSupplied(parse_checkbox(raw)),
            "anyStairs" => Self::AnyStairs(parse_checkbox(raw)),
            "specialItems" => Self::SpecialItems(text),
            _ => return Err(ValidationError::UnknownField(field.to_string())),
        };
        Ok(input)
    }
}

fn parse_option<T: FromStr>(raw: &str, field: &'static str) -> Result<T, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidOption { field })
}

fn parse_checkbox(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on"
    )
}

/// The booking returned by the create-booking call, with the payload it was
/// created from. Later draft edits never flow back into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedBooking {
    pub id: BookingId,
    pub request: CreateBookingRequest,
}

/// What a submission attempt should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPlan {
    Create(CreateBookingRequest),
    /// The booking already exists; the wizard went straight back to payment.
    AlreadyCreated(BookingId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: WizardStep,
    pub draft: BookingDraft,
    pub error: Option<String>,
    pub submitting: bool,
    pub created: Option<CreatedBooking>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::with_draft(BookingDraft::default())
    }

    pub fn with_draft(draft: BookingDraft) -> Self {
        Self {
            step: WizardStep::Contact,
            draft,
            error: None,
            submitting: false,
            created: None,
        }
    }

    pub fn update(&mut self, input: DraftInput) {
        let draft = &mut self.draft;
        match input {
            DraftInput::FirstName(v) => draft.first_name = v,
            DraftInput::LastName(v) => draft.last_name = v,
            DraftInput::Email(v) => draft.email = v,
            DraftInput::Phone(v) => draft.phone = format_phone_number(&v),
            DraftInput::MoveDate(v) => draft.move_date = v,
            DraftInput::MoveTime(v) => draft.move_time = v,
            DraftInput::MoveType(v) => draft.move_type = v,
            DraftInput::Bedrooms(v) => draft.bedrooms = v,
            DraftInput::PickupAddress(v) => draft.pickup_address = v,
            DraftInput::DropoffAddress(v) => draft.dropoff_address = v,
            DraftInput::NeedPackingHelp(v) => draft.need_packing_help = v,
            DraftInput::NeedBoxesSupplied(v) => draft.need_boxes_supplied = v,
            DraftInput::AnyStairs(v) => draft.any_stairs = v,
            DraftInput::SpecialItems(v) => draft.special_items = v,
        }
    }

    /// Validates the current step and moves forward on success.
    ///
    /// Payment is only reachable once a booking exists; until then the
    /// submission path is the way out of the move-details step.
    pub fn advance(&mut self) -> Result<WizardStep, ValidationError> {
        if let Err(err) = validate_step(self.step, &self.draft) {
            return Err(self.reject(err));
        }
        if self.step == WizardStep::MoveDetails && self.created.is_none() {
            return Err(self.reject(ValidationError::BookingNotCreated));
        }
        self.error = None;
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn retreat(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    pub fn is_payment_ready(&self) -> bool {
        self.step == WizardStep::Payment && self.created.is_some()
    }

    /// Starts a submission from the move-details step.
    pub fn begin_submission(&mut self) -> Result<SubmissionPlan, WizardError> {
        if self.submitting {
            return Err(SubmissionError::InProgress.into());
        }
        if self.step != WizardStep::MoveDetails {
            return Err(self.reject(ValidationError::MissingRequiredFields).into());
        }
        // Contact fields stay editable on step 2, so both steps are checked.
        let checked = validate_contact(&self.draft);
        if let Err(err) = checked.and_then(|()| validate_move_details(&self.draft)) {
            return Err(self.reject(err).into());
        }
        self.error = None;

        if let Some(created) = &self.created {
            let id = created.id.clone();
            self.step = WizardStep::Payment;
            return Ok(SubmissionPlan::AlreadyCreated(id));
        }

        self.submitting = true;
        Ok(SubmissionPlan::Create(CreateBookingRequest::from_draft(
            &self.draft,
        )))
    }

    /// Applies the outcome of the create-booking call.
    pub fn finish_submission(
        &mut self,
        request: CreateBookingRequest,
        response: anyhow::Result<Value>,
    ) -> Result<BookingId, SubmissionError> {
        self.submitting = false;

        let outcome = response
            .map_err(|err| SubmissionError::backend(&err))
            .and_then(|body| extract_booking_id(&body).ok_or(SubmissionError::MissingBookingId));

        match outcome {
            Ok(id) => {
                self.created = Some(CreatedBooking {
                    id: id.clone(),
                    request,
                });
                self.error = None;
                self.step = WizardStep::Payment;
                Ok(id)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Deposit request for the payment component, once payment is reachable.
    ///
    /// The guest email comes from the submitted booking, not the live draft.
    pub fn payment_request(&self, amount: u64) -> Option<PaymentRequest> {
        if !self.is_payment_ready() {
            return None;
        }
        let created = self.created.as_ref()?;
        Some(PaymentRequest {
            booking_id: created.id.clone(),
            amount,
            is_guest: true,
            guest_email: normalize_email(&created.request.customer_info.email),
        })
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        self.error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use serde_json::json;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("date")
    }

    fn fill_contact(s: &mut WizardState) {
        s.update(DraftInput::FirstName("John".into()));
        s.update(DraftInput::LastName("Doe".into()));
        s.update(DraftInput::Email("john@example.com".into()));
        s.update(DraftInput::Phone("5551234567".into()));
    }

    fn fill_move(s: &mut WizardState) {
        s.update(DraftInput::MoveDate(NaiveDate::from_ymd_opt(2030, 3, 4)));
        s.update(DraftInput::PickupAddress("1 Main St".into()));
        s.update(DraftInput::DropoffAddress("2 Oak St".into()));
    }

    fn at_move_details() -> WizardState {
        let mut s = WizardState::new();
        fill_contact(&mut s);
        s.advance().expect("contact valid");
        fill_move(&mut s);
        s
    }

    #[test]
    fn starts_on_contact_with_defaults() {
        let s = WizardState::new();
        assert_eq!(s.step, WizardStep::Contact);
        assert!(s.error.is_none());
        assert!(!s.submitting);
        assert!(s.created.is_none());
    }

    #[test]
    fn phone_edits_are_formatted() {
        let mut s = WizardState::new();
        s.update(DraftInput::Phone("555123".into()));
        assert_eq!(s.draft.phone, "(555) 123");
        s.update(DraftInput::Phone("(555) 1234567".into()));
        assert_eq!(s.draft.phone, "(555) 123-4567");
    }

    #[test]
    fn contact_failure_keeps_step_and_sets_error() {
        let mut s = WizardState::new();
        fill_contact(&mut s);
        s.update(DraftInput::Email("john@example".into()));

        assert_eq!(s.advance(), Err(ValidationError::InvalidEmail));
        assert_eq!(s.step, WizardStep::Contact);
        assert_eq!(
            s.error.as_deref(),
            Some("Please enter a valid email address")
        );

        s.update(DraftInput::Email("john@example.com".into()));
        assert_eq!(s.advance(), Ok(WizardStep::MoveDetails));
        assert!(s.error.is_none());
    }

    #[test]
    fn move_details_cannot_skip_submission() {
        let mut s = at_move_details();
        assert_eq!(s.advance(), Err(ValidationError::BookingNotCreated));
        assert_eq!(s.step, WizardStep::MoveDetails);
    }

    #[test]
    fn move_details_block_on_missing_fields() {
        let mut s = at_move_details();
        s.update(DraftInput::PickupAddress(String::new()));
        let err = s.begin_submission().expect_err("missing pickup");
        assert!(matches!(
            err,
            WizardError::Validation(ValidationError::MissingRequiredFields)
        ));
        assert_eq!(s.step, WizardStep::MoveDetails);
        assert!(!s.submitting);
        assert_eq!(
            s.error.as_deref(),
            Some("Please fill in all required fields")
        );
    }

    #[test]
    fn submission_rechecks_contact_edited_on_move_details() {
        let mut s = at_move_details();
        s.update(DraftInput::Email(String::new()));
        let err = s.begin_submission().expect_err("blank email");
        assert!(matches!(
            err,
            WizardError::Validation(ValidationError::MissingRequiredFields)
        ));
        assert!(!s.submitting);

        s.update(DraftInput::Email("john@example".into()));
        assert!(matches!(
            s.begin_submission(),
            Err(WizardError::Validation(ValidationError::InvalidEmail))
        ));
        assert_eq!(s.step, WizardStep::MoveDetails);

        s.update(DraftInput::Email("john@example.com".into()));
        assert!(matches!(s.begin_submission(), Ok(SubmissionPlan::Create(_))));
    }

    #[test]
    fn retreat_is_floored_at_contact() {
        let mut s = at_move_details();
        assert_eq!(s.retreat(), WizardStep::Contact);
        assert_eq!(s.retreat(), WizardStep::Contact);
    }

    #[test]
    fn successful_submission_moves_to_payment() {
        let mut s = at_move_details();
        let SubmissionPlan::Create(request) = s.begin_submission().expect("plan") else {
            panic!("expected a create plan");
        };
        assert!(s.submitting);
        assert!(matches!(
            s.begin_submission(),
            Err(WizardError::Submission(SubmissionError::InProgress))
        ));

        let id = s
            .finish_submission(request, Ok(json!({ "data": { "booking": { "_id": "bk-1" } } })))
            .expect("created");
        assert_eq!(id.as_str(), "bk-1");
        assert_eq!(s.step, WizardStep::Payment);
        assert!(!s.submitting);
        assert!(s.is_payment_ready());
    }

    #[test]
    fn missing_id_keeps_move_details() {
        let mut s = at_move_details();
        let SubmissionPlan::Create(request) = s.begin_submission().expect("plan") else {
            panic!("expected a create plan");
        };
        let err = s
            .finish_submission(request, Ok(json!({ "success": true })))
            .expect_err("no id");
        assert_eq!(err, SubmissionError::MissingBookingId);
        assert_eq!(s.step, WizardStep::MoveDetails);
        assert!(!s.submitting);
        assert_eq!(
            s.error.as_deref(),
            Some("Failed to get booking ID from response")
        );
    }

    #[test]
    fn backend_failure_surfaces_message() {
        let mut s = at_move_details();
        let SubmissionPlan::Create(request) = s.begin_submission().expect("plan") else {
            panic!("expected a create plan");
        };
        let err = s
            .finish_submission(request, Err(anyhow!("Selected date is fully booked")))
            .expect_err("backend error");
        assert_eq!(err.to_string(), "Selected date is fully booked");
        assert_eq!(s.error.as_deref(), Some("Selected date is fully booked"));
        assert!(s.created.is_none());
    }

    #[test]
    fn back_to_edit_keeps_created_booking() {
        let mut s = at_move_details();
        let SubmissionPlan::Create(request) = s.begin_submission().expect("plan") else {
            panic!("expected a create plan");
        };
        s.finish_submission(request, Ok(json!({ "_id": "bk-9" })))
            .expect("created");

        assert_eq!(s.retreat(), WizardStep::MoveDetails);
        s.update(DraftInput::Email("other@example.com".into()));
        s.update(DraftInput::AnyStairs(true));

        assert_eq!(
            s.begin_submission().expect("plan"),
            SubmissionPlan::AlreadyCreated(BookingId("bk-9".into()))
        );
        assert_eq!(s.step, WizardStep::Payment);
        let payment = s.payment_request(15_000).expect("payment");
        assert_eq!(payment.guest_email, "john@example.com");
        assert_eq!(
            s.created
                .as_ref()
                .expect("created")
                .request
                .pickup_address
                .stairs,
            0
        );
    }

    #[test]
    fn payment_request_requires_payment_step() {
        let s = at_move_details();
        assert!(s.payment_request(15_000).is_none());
    }

    #[test]
    fn form_fields_parse_by_name() {
        let mut s = WizardState::new();
        for (field, raw) in [
            ("phone", "555-123-4567"),
            ("moveDate", "2026-12-01"),
            ("moveTime", "11:00"),
            ("moveType", "office"),
            ("bedrooms", "5"),
            ("needBoxesSupplied", "yes"),
            ("anyStairs", "no"),
        ] {
            s.update(DraftInput::from_form(field, raw, today()).expect(field));
        }
        assert_eq!(s.draft.phone, "(555) 123-4567");
        assert_eq!(s.draft.move_date, NaiveDate::from_ymd_opt(2026, 12, 1));
        assert_eq!(s.draft.move_time, MoveTime::ElevenAm);
        assert_eq!(s.draft.move_type, MoveType::Office);
        assert_eq!(s.draft.bedrooms, Bedrooms::FivePlus);
        assert!(s.draft.need_boxes_supplied);
        assert!(!s.draft.any_stairs);
    }

    #[test]
    fn form_fields_reject_bad_values() {
        assert_eq!(
            DraftInput::from_form("moveDate", "2026-10-01", today()),
            Err(ValidationError::MoveDateInPast)
        );
        assert_eq!(
            DraftInput::from_form("moveTime", "07:00", today()),
            Err(ValidationError::InvalidOption { field: "move time" })
        );
        assert_eq!(
            DraftInput::from_form("favouriteColour", "blue", today()),
            Err(ValidationError::UnknownField("favouriteColour".into()))
        );
        assert_eq!(
            DraftInput::from_form("moveDate", "", today()),
            Ok(DraftInput::MoveDate(None))
        );
    }
}
