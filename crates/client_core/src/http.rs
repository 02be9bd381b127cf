use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use shared::{
    error::ApiError,
    protocol::{CreateBookingRequest, PaymentRequest},
};
use tracing::debug;

use crate::{BookingService, PaymentService};

fn endpoint(api_base_url: &str, path: &str) -> String {
    format!("{}/{}", api_base_url.trim_end_matches('/'), path)
}

/// Turns a non-2xx response into an error carrying the backend's message.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = ApiError::from_body(&body)
        .map(|err| err.message)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
    Err(anyhow!(message))
}

#[derive(Clone)]
pub struct HttpBookingService {
    http: Client,
    api_base_url: String,
}

impl HttpBookingService {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_base_url)
    }

    pub fn with_client(http: Client, api_base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_base_url: api_base_url.into(),
        }
    }
}

#[async_trait]
impl BookingService for HttpBookingService {
    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Value> {
        let url = endpoint(&self.api_base_url, "bookings");
        debug!(%url, "posting booking");
        let response = self.http.post(url).json(request).send().await?;
        let body = ensure_success(response).await?.json::<Value>().await?;
        Ok(body)
    }
}

#[derive(Clone)]
pub struct HttpPaymentService {
    http: Client,
    api_base_url: String,
}

impl HttpPaymentService {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_base_url)
    }

    pub fn with_client(http: Client, api_base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_base_url: api_base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentService for HttpPaymentService {
    async fn capture_deposit(&self, request: &PaymentRequest) -> Result<()> {
        let url = endpoint(&self.api_base_url, "payments/deposit");
        debug!(%url, booking_id = %request.booking_id, "posting deposit");
        let response = self.http.post(url).json(request).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
