use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BookingDraft, BookingId};

/// Deposit collected at the payment step, in cents.
pub const DEPOSIT_AMOUNT_CENTS: u64 = 15_000;

/// Category sent to the backend regardless of the apartment/house/office choice.
pub const BACKEND_MOVE_TYPE: &str = "residential";
pub const BASE_SERVICE: &str = "full-service";
pub const PACKING_SERVICE: &str = "packing";
pub const ESTIMATED_DURATION_HOURS: u32 = 2;
/// Stair count reported on both legs whenever the customer ticks "any stairs".
pub const STAIRS_PLACEHOLDER: u32 = 10;

const SERVICE_CITY: &str = "Las Vegas";
const SERVICE_STATE: &str = "NV";
const PICKUP_ZIP_CODE: &str = "89101";
const DROPOFF_ZIP_CODE: &str = "89102";

/// JSON pointers tried, in order, for the created booking's id.
pub const BOOKING_ID_POINTERS: &[&str] = &["/data/booking/_id", "/data/_id", "/_id"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub stairs: u32,
    pub elevator: bool,
    pub notes: String,
}

impl AddressPayload {
    fn in_service_area(street: &str, zip_code: &str, stairs: u32, notes: &str) -> Self {
        Self {
            street: street.to_string(),
            city: SERVICE_CITY.to_string(),
            state: SERVICE_STATE.to_string(),
            zip_code: zip_code.to_string(),
            stairs,
            elevator: false,
            notes: notes.to_string(),
        }
    }
}

/// Body of the create-booking call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub customer_info: CustomerInfo,
    pub move_date: String,
    pub move_time: String,
    pub move_type: String,
    pub home_size: String,
    pub estimated_duration: u32,
    pub pickup_address: AddressPayload,
    pub dropoff_address: AddressPayload,
    pub services_requested: Vec<String>,
    pub packing_required: bool,
    pub items: Vec<Value>,
    pub special_instructions: String,
}

impl CreateBookingRequest {
    /// Maps a validated draft onto the backend's booking shape.
    ///
    /// City, state and zip code are fixed to the service area and the stair
    /// count is shared by both legs; the backend does not receive the
    /// apartment/house/office choice.
    pub fn from_draft(draft: &BookingDraft) -> Self {
        let stairs = if draft.any_stairs {
            STAIRS_PLACEHOLDER
        } else {
            0
        };

        let mut services_requested = vec![BASE_SERVICE.to_string()];
        if draft.need_packing_help {
            services_requested.push(PACKING_SERVICE.to_string());
        }
        if draft.need_boxes_supplied {
            services_requested.push(PACKING_SERVICE.to_string());
        }

        Self {
            customer_info: CustomerInfo {
                first_name: draft.first_name.trim().to_string(),
                last_name: draft.last_name.trim().to_string(),
                email: normalize_email(&draft.email),
                phone: draft.phone.clone(),
            },
            move_date: draft
                .move_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            move_time: draft.move_time.as_str().to_string(),
            move_type: BACKEND_MOVE_TYPE.to_string(),
            home_size: format!("{}-bedroom", draft.bedrooms.as_str()),
            estimated_duration: ESTIMATED_DURATION_HOURS,
            pickup_address: AddressPayload::in_service_area(
                &draft.pickup_address,
                PICKUP_ZIP_CODE,
                stairs,
                &draft.special_items,
            ),
            dropoff_address: AddressPayload::in_service_area(
                &draft.dropoff_address,
                DROPOFF_ZIP_CODE,
                stairs,
                "",
            ),
            services_requested,
            packing_required: draft.need_packing_help || draft.need_boxes_supplied,
            items: Vec::new(),
            special_instructions: draft.special_items.clone(),
        }
    }
}

/// What the payment component is handed once the booking exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub booking_id: BookingId,
    pub amount: u64,
    pub is_guest: bool,
    pub guest_email: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Finds the created booking's id in a create-booking response.
///
/// The backend has answered with the id at several depths; the first pointer
/// in [`BOOKING_ID_POINTERS`] holding a non-empty string or a number wins.
pub fn extract_booking_id(body: &Value) -> Option<BookingId> {
    BOOKING_ID_POINTERS
        .iter()
        .find_map(|pointer| body.pointer(pointer).and_then(id_from_value))
}

fn id_from_value(value: &Value) -> Option<BookingId> {
    match value {
        Value::String(id) if !id.is_empty() => Some(BookingId(id.clone())),
        Value::Number(id) => Some(BookingId(id.to_string())),
        _ => None,
    }
}
