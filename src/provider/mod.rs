//! DNS provider integration.
//!
//! A [`DnsProvider`] creates and deletes the TXT records used to answer [RFC-8555][RFC-8555]
//! [DNS-01] challenges. [`ProviderClient`] is the implementation backed by the
//! [Dinahosting API][dinahosting-api].
//!
//! # Wire format
//!
//! Every call is a single `POST` to `https://dinahosting.com/special/api.php` with the headers
//! `Content-Type: application/json` and `Authorization: Basic <base64(username:password)>`, and a
//! JSON body of the form:
//!
//! ```json
//! {
//!   "method": "Domain_Zone_AddTypeTXT",
//!   "params": { "domain": "example.com", "hostname": "_acme-challenge", "text": "XXXX" }
//! }
//! ```
//!
//! Deleting uses the method `Domain_Zone_DeleteTypeTXT` and names the record content `value`
//! instead of `text`. Records are deleted by content, there is no record identifier.
//!
//! A call succeeds when the API answers HTTP 200 (OK) with a JSON body. The body is not
//! otherwise inspected unless a [`validator::ResponseValidator`] is installed.
//!
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
//! [dinahosting-api]: https://en.dinahosting.com/api

use crate::error::Error;
use std::sync::Arc;

pub mod client;
pub mod model;
pub mod validator;

pub use client::ProviderClient;
pub use model::{ApiEnvelope, Method, TxtRecordRequest};

/// `DynProvider` is a type alias for a [`DnsProvider`] that can be shared between consumers
/// through an [`Arc`]. Providers hold no mutable state.
pub type DynProvider = Arc<dyn DnsProvider + Send + Sync>;

/// An async trait describing a DNS hosting provider able to create and delete TXT records.
///
/// Each call is independent: there is no retry, batching or ordering between calls. Callers
/// wanting create, then validate, then delete must sequence the calls themselves.
#[async_trait::async_trait]
pub trait DnsProvider {
    /// A short name identifying the provider, e.g. `dinahosting`.
    fn name(&self) -> &'static str;

    /// Create a TXT record. Calling this twice with the same record issues two requests.
    async fn add_txt_record(&self, record: &TxtRecordRequest) -> Result<(), Error>;

    /// Delete the TXT record with the given name and content.
    async fn delete_txt_record(&self, record: &TxtRecordRequest) -> Result<(), Error>;
}
