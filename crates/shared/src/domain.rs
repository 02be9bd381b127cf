use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParseOptionError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(BookingId);

/// Declares a closed set of select options with wire values and display labels.
/// The variant marked `#[default]` is the form's initial selection.
macro_rules! select_options {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOptionError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let value = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str().eq_ignore_ascii_case(value))
                    .ok_or_else(|| ParseOptionError::new(stringify!($name), value))
            }
        }
    };
}

select_options! {
    /// Preferred arrival slot offered by the move-details step.
    MoveTime {
        EightAm => ("08:00", "8:00 AM"),
        #[default]
        NineAm => ("09:00", "9:00 AM"),
        TenAm => ("10:00", "10:00 AM"),
        ElevenAm => ("11:00", "11:00 AM"),
        Noon => ("12:00", "12:00 PM"),
        OnePm => ("13:00", "1:00 PM"),
        TwoPm => ("14:00", "2:00 PM"),
    }
}

select_options! {
    MoveType {
        #[default]
        Apartment => ("apartment", "Apartment"),
        House => ("house", "House"),
        Office => ("office", "Office"),
    }
}

select_options! {
    /// Bedroom count; the last option stands for five or more.
    Bedrooms {
        One => ("1", "1 Bedroom"),
        #[default]
        Two => ("2", "2 Bedrooms"),
        Three => ("3", "3 Bedrooms"),
        Four => ("4", "4 Bedrooms"),
        FivePlus => ("5", "5+ Bedrooms"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Contact,
    MoveDetails,
    Payment,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Contact => 1,
            WizardStep::MoveDetails => 2,
            WizardStep::Payment => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Contact => "Contact Info",
            WizardStep::MoveDetails => "Move Details",
            WizardStep::Payment => "Payment",
        }
    }

    pub fn next(self) -> Self {
        match self {
            WizardStep::Contact => WizardStep::MoveDetails,
            WizardStep::MoveDetails | WizardStep::Payment => WizardStep::Payment,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            WizardStep::Contact | WizardStep::MoveDetails => WizardStep::Contact,
            WizardStep::Payment => WizardStep::MoveDetails,
        }
    }
}

/// The in-progress booking record collected by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub move_date: Option<NaiveDate>,
    pub move_time: MoveTime,
    pub move_type: MoveType,
    pub bedrooms: Bedrooms,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub need_packing_help: bool,
    pub need_boxes_supplied: bool,
    pub any_stairs: bool,
    pub special_items: String,
}

impl BookingDraft {
    /// Lines of the booking summary shown next to the payment form.
    pub fn summary_lines(&self) -> Vec<String> {
        let date = self
            .move_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let plural = if self.bedrooms == Bedrooms::One {
            ""
        } else {
            "s"
        };

        let mut lines = vec![
            format!("Customer: {} {}", self.first_name, self.last_name),
            format!("Email: {}", self.email),
            format!("Phone: {}", self.phone),
            format!("Date: {date} at {}", self.move_time),
            format!(
                "Type: {} ({} bedroom{plural})",
                self.move_type.label(),
                self.bedrooms
            ),
            format!("From: {}", self.pickup_address),
            format!("To: {}", self.dropoff_address),
        ];
        if self.need_packing_help {
            lines.push("Packing Help Requested".to_string());
        }
        if self.need_boxes_supplied {
            lines.push("Boxes Supplied".to_string());
        }
        if self.any_stairs {
            lines.push("Stairs Present".to_string());
        }
        lines
    }
}
