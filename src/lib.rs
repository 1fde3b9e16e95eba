//! Dina Crab
//!
//! Solves [RFC-8555][RFC-8555] [DNS-01] challenges for domains hosted by [Dinahosting], creating
//! and deleting the challenge TXT records through the [Dinahosting API][dinahosting-api].
//!
//! The [`ProviderClient`] speaks to the API, the [`Authenticator`] works out which zone and
//! hostname a challenge record belongs to and sequences the create, wait and delete steps. The
//! `dinacrab` binary wraps both as a certbot manual auth/cleanup hook.
//!
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
//! [Dinahosting]: https://dinahosting.com
//! [dinahosting-api]: https://en.dinahosting.com/api
//!
#![warn(clippy::pedantic)]

pub mod authenticator;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod provider;

pub use authenticator::Authenticator;
pub use config::Config;
pub use credentials::Credentials;
pub use domain::SuffixList;
pub use provider::{DnsProvider, DynProvider, ProviderClient, TxtRecordRequest};
