//! Terminal front end for the booking wizard.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use client_core::{BookingWizard, Navigator, WizardError};
use shared::domain::{Bedrooms, MoveTime, MoveType, WizardStep};
use tracing::info;

/// Resolves wizard paths against the public site and prints the result.
pub struct TerminalNavigator {
    site_url: String,
}

impl TerminalNavigator {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> String {
        format!("{}{path}", self.site_url)
    }
}

#[async_trait]
impl Navigator for TerminalNavigator {
    async fn navigate(&self, path: &str) -> Result<()> {
        let url = self.resolve(path);
        info!(%url, "opening confirmation");
        println!("Booking confirmed: {url}");
        Ok(())
    }
}

pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn options_hint<T: Copy>(options: &[T], show: impl Fn(T) -> String) -> String {
    options
        .iter()
        .map(|option| show(*option))
        .collect::<Vec<_>>()
        .join(", ")
}

struct Field {
    name: &'static str,
    label: String,
}

impl Field {
    fn new(name: &'static str, label: impl Into<String>) -> Self {
        Self {
            name,
            label: label.into(),
        }
    }
}

fn contact_fields() -> Vec<Field> {
    vec![
        Field::new("firstName", "First Name *"),
        Field::new("lastName", "Last Name *"),
        Field::new("email", "Email Address *"),
        Field::new("phone", "Phone Number (USA) *, e.g. (555) 123-4567"),
    ]
}

fn move_fields() -> Vec<Field> {
    vec![
        Field::new("moveDate", "Move Date * (YYYY-MM-DD)"),
        Field::new(
            "moveTime",
            format!(
                "Preferred Time [{}]",
                options_hint(MoveTime::ALL, |t| t.as_str().to_string())
            ),
        ),
        Field::new(
            "moveType",
            format!(
                "Type of Move [{}]",
                options_hint(MoveType::ALL, |t| t.as_str().to_string())
            ),
        ),
        Field::new(
            "bedrooms",
            format!(
                "Number of Bedrooms [{}]",
                options_hint(Bedrooms::ALL, |b| format!("{}={}", b.as_str(), b.label()))
            ),
        ),
        Field::new("pickupAddress", "Pickup Address *"),
        Field::new("dropoffAddress", "Dropoff Address *"),
        Field::new("needPackingHelp", "Need packing help? (y/n)"),
        Field::new("needBoxesSupplied", "Need boxes supplied? (y/n)"),
        Field::new("anyStairs", "Any stairs? (y/n)"),
        Field::new("specialItems", "Special Items (optional)"),
    ]
}

/// Drives the wizard from line-based input until the deposit is paid.
///
/// Blank answers keep the current value. Returns the confirmation path.
pub struct TerminalWizard<'a, R, W> {
    wizard: &'a BookingWizard,
    input: R,
    output: W,
    today: NaiveDate,
}

impl<'a, R: BufRead, W: Write> TerminalWizard<'a, R, W> {
    pub fn new(wizard: &'a BookingWizard, input: R, output: W, today: NaiveDate) -> Self {
        Self {
            wizard,
            input,
            output,
            today,
        }
    }

    pub async fn run(&mut self) -> Result<String> {
        loop {
            let state = self.wizard.snapshot().await;
            writeln!(
                self.output,
                "\n== Step {} of 3: {} ==",
                state.step.number(),
                state.step.title()
            )?;
            if let Some(error) = &state.error {
                writeln!(self.output, "! {error}")?;
            }

            match state.step {
                WizardStep::Contact => {
                    self.ask_fields(&contact_fields()).await?;
                    let _ = self.wizard.advance().await;
                }
                WizardStep::MoveDetails => {
                    self.ask_fields(&move_fields()).await?;
                    let answer =
                        self.prompt("Press Enter to continue to payment, or type 'back':")?;
                    if answer.eq_ignore_ascii_case("back") {
                        self.wizard.retreat().await;
                        continue;
                    }
                    writeln!(self.output, "Processing...")?;
                    match self.wizard.submit().await {
                        Ok(_) | Err(WizardError::Validation(_) | WizardError::Submission(_)) => {}
                        Err(err) => return Err(err.into()),
                    }
                }
                WizardStep::Payment => {
                    if let Some(path) = self.payment_step().await? {
                        return Ok(path);
                    }
                }
            }
        }
    }

    async fn payment_step(&mut self) -> Result<Option<String>> {
        let state = self.wizard.snapshot().await;
        let Some(request) = self.wizard.payment_request().await else {
            self.wizard.back_to_edit().await;
            return Ok(None);
        };

        writeln!(self.output, "Booking Summary")?;
        for line in state.draft.summary_lines() {
            writeln!(self.output, "  {line}")?;
        }
        writeln!(
            self.output,
            "Deposit due: {} (booking {})",
            format_cents(request.amount),
            request.booking_id
        )?;

        let answer = self.prompt("Press Enter to pay the deposit, or type 'back' to edit:")?;
        if answer.eq_ignore_ascii_case("back") {
            self.wizard.back_to_edit().await;
            return Ok(None);
        }

        match self.wizard.pay().await {
            Ok(path) => Ok(Some(path)),
            Err(WizardError::Payment(err)) => {
                writeln!(self.output, "! Payment failed: {err}")?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn ask_fields(&mut self, fields: &[Field]) -> Result<()> {
        for field in fields {
            loop {
                let answer = self.prompt(&field.label)?;
                if answer.is_empty() {
                    break;
                }
                match self
                    .wizard
                    .update_form(field.name, &answer, self.today)
                    .await
                {
                    Ok(()) => break,
                    Err(err) => writeln!(self.output, "! {err}")?,
                }
            }
        }
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        writeln!(self.output, "{label}")?;
        write!(self.output, "> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed before the booking was completed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
