//! A [Dinahosting API][dinahosting-api] backed implementation of the
//! [`DnsProvider`][super::DnsProvider] trait.
//!
//! [dinahosting-api]: https://en.dinahosting.com/api

use crate::credentials::Credentials;
use crate::error::Error;
use crate::provider::model::{ApiEnvelope, Method, Params, TxtRecordRequest};
use crate::provider::validator::ResponseValidator;
use crate::provider::DnsProvider;
use lazy_static::lazy_static;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, IntoUrl, StatusCode, Url};
use serde_json::Value;
use std::fmt;

lazy_static! {
    static ref DINAHOSTING_API_URL: Url =
        Url::parse("https://dinahosting.com/special/api.php").unwrap();
}

/// A client for the Dinahosting API, authenticating every request with the [`Credentials`] it
/// was constructed with.
///
/// Each operation performs exactly one HTTP round trip using the transport's default timeout.
/// Callers needing bounded latency should wrap calls in [`tokio::time::timeout`].
#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    endpoint: Url,
    credentials: Credentials,
    validator: Option<ResponseValidator>,
}

impl ProviderClient {
    /// Create a client for the public Dinahosting API endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client can't be initialised.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        Self::with_endpoint(credentials, DINAHOSTING_API_URL.clone())
    }

    /// Create a client sending requests to `endpoint` instead of the public API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if `endpoint` isn't a valid URL or the HTTP client can't be
    /// initialised.
    pub fn with_endpoint(credentials: Credentials, endpoint: impl IntoUrl) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(concat!("dinacrab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        tracing::debug!("creating Dinahosting client for {}", credentials.username());
        Ok(Self {
            http,
            endpoint: endpoint.into_url()?,
            credentials,
            validator: None,
        })
    }

    /// Install a validator run against every parsed response body.
    #[must_use]
    pub fn with_validator(mut self, validator: ResponseValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Call an API method with the given parameters, returning the parsed JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the API answers with a status other than 200 (OK).
    ///
    /// Returns [`Error::MalformedResponse`] if the response body isn't JSON.
    ///
    /// Returns [`Error::Rejected`] if an installed validator refuses the response.
    ///
    /// Returns [`Error::Http`] if the request can't be sent or the response can't be read.
    pub async fn invoke(&self, method: Method, params: Params) -> Result<Value, Error> {
        let envelope = ApiEnvelope { method, params };
        let body = serde_json::to_string(&envelope)?;
        tracing::debug!("API request to {}: {body}", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.credentials.authorization_header())
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::debug!("{method} failed with HTTP {status}");
            return Err(Error::Transport {
                status: status.as_u16(),
            });
        }

        let text = resp.text().await?;
        let result: Value = match serde_json::from_str(&text) {
            Ok(result) => result,
            Err(_) => return Err(Error::MalformedResponse { body: text }),
        };
        tracing::debug!("{method} result: {result}");

        if let Some(validator) = &self.validator {
            validator(&result).map_err(Error::Rejected)?;
        }
        Ok(result)
    }
}

impl fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("credentials", &self.credentials)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl DnsProvider for ProviderClient {
    fn name(&self) -> &'static str {
        "dinahosting"
    }

    async fn add_txt_record(&self, record: &TxtRecordRequest) -> Result<(), Error> {
        let method = Method::AddTypeTxt;
        self.invoke(method, record.params(method)).await?;
        tracing::info!(
            "added TXT record \"{}\" to {}",
            record.hostname,
            record.domain
        );
        Ok(())
    }

    async fn delete_txt_record(&self, record: &TxtRecordRequest) -> Result<(), Error> {
        let method = Method::DeleteTypeTxt;
        self.invoke(method, record.params(method)).await?;
        tracing::info!(
            "deleted TXT record \"{}\" from {}",
            record.hostname,
            record.domain
        );
        Ok(())
    }
}
