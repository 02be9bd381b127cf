use std::{fs, io, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use client_core::{
    phone::format_phone_number,
    validation::{validate_contact, validate_draft_input, validate_move_details},
    BookingWizard, HttpBookingService, HttpPaymentService,
};
use shared::{domain::BookingDraft, protocol::CreateBookingRequest};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, normalize_base_url, DEFAULT_CONFIG_FILE};
use terminal::{TerminalNavigator, TerminalWizard};

#[derive(Parser, Debug)]
#[command(name = "booking", about = "Book a move and pay the deposit")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides the booking API base url, e.g. http://localhost:5000/api
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    site_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through contact, move details and payment interactively.
    Wizard,
    /// Submit a draft saved as JSON, then pay the deposit.
    Submit {
        #[arg(long)]
        draft: PathBuf,
        /// Print the create-booking payload without calling the backend.
        #[arg(long)]
        dry_run: bool,
    },
    FormatPhone { value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    if let Command::FormatPhone { value } = &cli.command {
        println!("{}", format_phone_number(value));
        return Ok(());
    }

    let mut settings = load_settings(&cli.config)?;
    if let Some(api_url) = &cli.api_url {
        settings.api_base_url = normalize_base_url(api_url)?;
    }
    if let Some(site_url) = &cli.site_url {
        settings.site_url = normalize_base_url(site_url)?;
    }
    info!(api = %settings.api_base_url, site = %settings.site_url, "settings loaded");

    let wizard = BookingWizard::new(
        Arc::new(HttpBookingService::new(settings.api_base_url.clone())),
        Arc::new(HttpPaymentService::new(settings.api_base_url.clone())),
        Arc::new(TerminalNavigator::new(settings.site_url.clone())),
    )
    .with_deposit_cents(settings.deposit_cents);

    match cli.command {
        Command::Wizard => {
            let today = Local::now().date_naive();
            let path = TerminalWizard::new(&wizard, io::stdin().lock(), io::stdout(), today)
                .run()
                .await?;
            info!(%path, "booking complete");
        }
        Command::Submit {
            draft: draft_path,
            dry_run,
        } => {
            let raw = fs::read_to_string(&draft_path)
                .with_context(|| format!("failed to read draft '{}'", draft_path.display()))?;
            let draft: BookingDraft = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse draft '{}'", draft_path.display()))?;
            let today = Local::now().date_naive();

            if dry_run {
                print_payload(draft, today)?;
            } else {
                submit_draft(wizard.with_loaded_draft(draft, today)?).await?;
            }
        }
        Command::FormatPhone { .. } => {}
    }

    Ok(())
}

fn print_payload(mut draft: BookingDraft, today: NaiveDate) -> Result<()> {
    draft.phone = format_phone_number(&draft.phone);
    validate_draft_input(&draft, today)?;
    validate_contact(&draft)?;
    validate_move_details(&draft)?;
    let payload = CreateBookingRequest::from_draft(&draft);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Runs a pre-filled draft through the same transitions as the interactive wizard.
async fn submit_draft(wizard: BookingWizard) -> Result<()> {
    wizard.advance().await?;
    let booking_id = wizard.submit().await?;
    println!("Booking created: {booking_id}");

    let Some(request) = wizard.payment_request().await else {
        bail!("booking {booking_id} is not ready for payment");
    };
    println!(
        "Paying deposit of {} as guest {}",
        terminal::format_cents(request.amount),
        request.guest_email
    );
    wizard.pay().await?;
    Ok(())
}
