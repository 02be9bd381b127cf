use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use shared::domain::{BookingDraft, WizardStep};

use crate::{
    error::ValidationError,
    phone::{phone_digits, PHONE_DIGITS},
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_digits(phone).len() == PHONE_DIGITS
}

/// Contact step: presence first, then email shape, then phone length.
pub fn validate_contact(draft: &BookingDraft) -> Result<(), ValidationError> {
    if draft.first_name.is_empty()
        || draft.last_name.is_empty()
        || draft.email.is_empty()
        || draft.phone.is_empty()
    {
        return Err(ValidationError::MissingRequiredFields);
    }
    if !is_valid_email(&draft.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(&draft.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Move-details step: addresses are free text, only presence is checked.
pub fn validate_move_details(draft: &BookingDraft) -> Result<(), ValidationError> {
    if draft.move_date.is_none()
        || draft.pickup_address.is_empty()
        || draft.dropoff_address.is_empty()
    {
        return Err(ValidationError::MissingRequiredFields);
    }
    Ok(())
}

pub fn validate_step(step: WizardStep, draft: &BookingDraft) -> Result<(), ValidationError> {
    match step {
        WizardStep::Contact => validate_contact(draft),
        WizardStep::MoveDetails => validate_move_details(draft),
        WizardStep::Payment => Ok(()),
    }
}

/// The date picker's lower bound: today is the earliest bookable day.
pub fn check_move_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::MoveDateInPast);
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` move date, refusing days before `today`.
pub fn parse_move_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidMoveDate)?;
    check_move_date(date, today)?;
    Ok(date)
}

/// Applies the input-layer rules to a draft that did not come through the
/// form, such as one loaded from a file.
pub fn validate_draft_input(
    draft: &BookingDraft,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    match draft.move_date {
        Some(date) => check_move_date(date, today),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> BookingDraft {
        BookingDraft {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john@example.com".into(),
            phone: "(555) 123-4567".into(),
            ..BookingDraft::default()
        }
    }

    fn move_details() -> BookingDraft {
        BookingDraft {
            move_date: NaiveDate::from_ymd_opt(2030, 1, 2),
            pickup_address: "1 Main St".into(),
            dropoff_address: "2 Oak St".into(),
            ..BookingDraft::default()
        }
    }

    #[test]
    fn email_pattern_cases() {
        let valid = ["john@example.com", "a@b.co", "first.last+tag@sub.org"];
        for email in valid {
            assert!(is_valid_email(email), "{email} should pass");
        }
        let invalid = ["abc", "a@b", "a@b.", "@b.com", "a@.com"];
        for email in invalid {
            assert!(!is_valid_email(email), "{email} should fail");
        }
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn complete_contact_passes() {
        assert_eq!(validate_contact(&contact()), Ok(()));
        assert_eq!(
            validate_contact(&BookingDraft {
                phone: "5551234567".into(),
                ..contact()
            }),
            Ok(())
        );
    }

    #[test]
    fn any_missing_contact_field_reports_generic_message() {
        let cases = [
            BookingDraft {
                first_name: String::new(),
                ..contact()
            },
            BookingDraft {
                last_name: String::new(),
                ..contact()
            },
            BookingDraft {
                email: String::new(),
                ..contact()
            },
            BookingDraft {
                phone: String::new(),
                ..contact()
            },
        ];
        for draft in cases {
            assert_eq!(
                validate_contact(&draft),
                Err(ValidationError::MissingRequiredFields)
            );
        }
    }

    #[test]
    fn first_failing_contact_check_wins() {
        let draft = BookingDraft {
            email: "not-an-email".into(),
            phone: "123".into(),
            ..contact()
        };
        assert_eq!(validate_contact(&draft), Err(ValidationError::InvalidEmail));

        let draft = BookingDraft {
            phone: "(555) 123-456".into(),
            ..contact()
        };
        assert_eq!(validate_contact(&draft), Err(ValidationError::InvalidPhone));

        let draft = BookingDraft {
            email: String::new(),
            phone: "1".into(),
            ..contact()
        };
        assert_eq!(
            validate_contact(&draft),
            Err(ValidationError::MissingRequiredFields)
        );
    }

    #[test]
    fn phone_length_counts_digits_only() {
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("555 123 4567"));
        assert!(!is_valid_phone("1 (555) 123-4567"));
        assert!(!is_valid_phone("555-1234"));
    }

    #[test]
    fn move_details_require_date_and_both_addresses() {
        assert_eq!(validate_move_details(&move_details()), Ok(()));

        let cases = [
            BookingDraft {
                move_date: None,
                ..move_details()
            },
            BookingDraft {
                pickup_address: String::new(),
                ..move_details()
            },
            BookingDraft {
                dropoff_address: String::new(),
                ..move_details()
            },
        ];
        for draft in cases {
            assert_eq!(
                validate_move_details(&draft),
                Err(ValidationError::MissingRequiredFields)
            );
        }
    }

    #[test]
    fn move_details_ignore_contact_fields() {
        let draft = BookingDraft {
            email: "broken".into(),
            ..move_details()
        };
        assert_eq!(validate_step(WizardStep::MoveDetails, &draft), Ok(()));
        let empty = BookingDraft::default();
        assert_eq!(validate_step(WizardStep::Payment, &empty), Ok(()));
    }

    #[test]
    fn move_date_input_rejects_past_days() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
        assert_eq!(parse_move_date("2026-10-18", today), Ok(today));
        assert_eq!(
            parse_move_date(" 2027-01-05 ", today),
            Ok(NaiveDate::from_ymd_opt(2027, 1, 5).expect("date"))
        );
        assert_eq!(
            parse_move_date("2026-10-17", today),
            Err(ValidationError::MoveDateInPast)
        );
        assert_eq!(
            parse_move_date("10/20/2026", today),
            Err(ValidationError::InvalidMoveDate)
        );
    }

    #[test]
    fn loaded_drafts_follow_the_date_picker_bound() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
        let past = BookingDraft {
            move_date: NaiveDate::from_ymd_opt(2001, 1, 1),
            ..move_details()
        };
        assert_eq!(
            validate_draft_input(&past, today),
            Err(ValidationError::MoveDateInPast)
        );
        assert_eq!(validate_draft_input(&move_details(), today), Ok(()));
        assert_eq!(validate_draft_input(&BookingDraft::default(), today), Ok(()));
        assert_eq!(check_move_date(today, today), Ok(()));
    }
}
