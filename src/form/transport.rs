//! Outbound HTTP for the contact form
//!
//! The dispatcher only sees `FormTransport`; `HttpTransport` is the
//! reqwest implementation used by the binary.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::fields::ValidFields;
use crate::error::TransportError;

/// Trait for the endpoint that receives contact form posts
#[async_trait]
pub trait FormTransport: Send + Sync {
    /// POST the fields to `action` and report the response status.
    ///
    /// Any status is `Ok`; only failures to get a response are `Err`.
    /// The response body is not read.
    async fn post_form(&self, action: &Url, fields: &ValidFields)
        -> Result<StatusCode, TransportError>;
}

/// reqwest implementation of FormTransport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

/// Multipart body with one text part per field, in form order.
pub fn multipart_body(fields: &ValidFields) -> Form {
    fields
        .parts()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name, value.to_string())
        })
}

#[async_trait]
impl FormTransport for HttpTransport {
    async fn post_form(
        &self,
        action: &Url,
        fields: &ValidFields,
    ) -> Result<StatusCode, TransportError> {
        if !matches!(action.scheme(), "http" | "https") {
            return Err(TransportError::InvalidAction(action.to_string()));
        }

        debug!(action = %action, "posting contact form");

        let response = self
            .client
            .post(action.clone())
            .header(ACCEPT, "application/json")
            .multipart(multipart_body(fields))
            .send()
            .await?;

        Ok(response.status())
    }
}
