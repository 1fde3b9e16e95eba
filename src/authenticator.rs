//! DNS-01 challenge handling.
//!
//! The [`Authenticator`] drives a [`DnsProvider`] for an ACME client: before validation is
//! requested it [performs][Authenticator::perform] the challenge by creating the TXT record and
//! then [waits][Authenticator::wait_for_propagation] for the record to reach the resolvers the
//! ACME server validates with. Whatever the validation outcome, the record is removed again with
//! [`Authenticator::cleanup`].

use crate::domain::{relative_hostname, SuffixList};
use crate::error::Error;
use crate::provider::{DynProvider, TxtRecordRequest};
use std::time::Duration;

/// The label under which [RFC-8555][RFC-8555] [DNS-01] challenge responses are published.
///
/// [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
/// [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// Default time allowed for a new record to propagate before validation.
pub const DEFAULT_PROPAGATION: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct Authenticator {
    provider: DynProvider,
    suffixes: SuffixList,
    propagation: Duration,
}

impl Authenticator {
    pub fn new(provider: DynProvider, suffixes: SuffixList, propagation: Duration) -> Self {
        Authenticator {
            provider,
            suffixes,
            propagation,
        }
    }

    /// The name the challenge TXT record for `domain` is published at. Wildcard domains share
    /// the record of their base domain.
    #[must_use]
    pub fn validation_name(domain: &str) -> String {
        let domain = domain.strip_prefix("*.").unwrap_or(domain);
        format!("{ACME_CHALLENGE_LABEL}.{domain}")
    }

    /// The record to manage for a challenge on `domain`, published at `validation_name` with
    /// content `validation`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRegistrableDomain`] if `domain` is a public suffix.
    ///
    /// Returns [`Error::NotInDomain`] if `validation_name` isn't under the registrable domain.
    pub fn record_for(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<TxtRecordRequest, Error> {
        let domain = domain.strip_prefix("*.").unwrap_or(domain);
        let zone = self.suffixes.registrable_domain(domain)?;
        let hostname = relative_hostname(validation_name, &zone)?;
        Ok(TxtRecordRequest::new(zone, hostname, validation))
    }

    /// Create the challenge TXT record.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Authenticator::record_for`] or the provider.
    pub async fn perform(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let record = self.record_for(domain, validation_name, validation)?;
        tracing::debug!(
            "creating {} record \"{}\" in {} for {domain}",
            self.provider.name(),
            record.hostname,
            record.domain
        );
        self.provider.add_txt_record(&record).await
    }

    /// Sleep for the configured propagation delay.
    pub async fn wait_for_propagation(&self) {
        if self.propagation.is_zero() {
            return;
        }
        tracing::info!(
            "waiting {}s for DNS changes to propagate",
            self.propagation.as_secs()
        );
        tokio::time::sleep(self.propagation).await;
    }

    /// Delete the challenge TXT record.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Authenticator::record_for`] or the provider.
    pub async fn cleanup(
        &self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let record = self.record_for(domain, validation_name, validation)?;
        tracing::debug!(
            "deleting {} record \"{}\" in {} for {domain}",
            self.provider.name(),
            record.hostname,
            record.domain
        );
        self.provider.delete_txt_record(&record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::DnsProvider;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Add(TxtRecordRequest),
        Delete(TxtRecordRequest),
    }

    #[derive(Default)]
    struct RecordingProvider {
        calls: Mutex<Vec<Call>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl DnsProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn add_txt_record(&self, record: &TxtRecordRequest) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Transport { status: 500 });
            }
            self.calls.lock().unwrap().push(Call::Add(record.clone()));
            Ok(())
        }

        async fn delete_txt_record(&self, record: &TxtRecordRequest) -> Result<(), Error> {
            self.calls.lock().unwrap().push(Call::Delete(record.clone()));
            Ok(())
        }
    }

    fn authenticator(provider: Arc<RecordingProvider>) -> Authenticator {
        Authenticator::new(provider, SuffixList::builtin(), Duration::ZERO)
    }

    #[test]
    fn validation_names() {
        assert_eq!(
            Authenticator::validation_name("example.com"),
            "_acme-challenge.example.com"
        );
        assert_eq!(
            Authenticator::validation_name("*.www.example.com"),
            "_acme-challenge.www.example.com"
        );
    }

    #[tokio::test]
    async fn perform_then_cleanup() {
        let provider = Arc::new(RecordingProvider::default());
        let auth = authenticator(provider.clone());
        let name = Authenticator::validation_name("www.example.co.uk");

        auth.perform("www.example.co.uk", &name, "abc123").await.unwrap();
        auth.wait_for_propagation().await;
        auth.cleanup("www.example.co.uk", &name, "abc123").await.unwrap();

        let expected = TxtRecordRequest::new("example.co.uk", "_acme-challenge.www", "abc123");
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec![Call::Add(expected.clone()), Call::Delete(expected)]
        );
    }

    #[tokio::test]
    async fn wildcard_domain_uses_base_record() {
        let provider = Arc::new(RecordingProvider::default());
        let auth = authenticator(provider.clone());
        let name = Authenticator::validation_name("*.example.com");

        auth.perform("*.example.com", &name, "v").await.unwrap();
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec![Call::Add(TxtRecordRequest::new(
                "example.com",
                "_acme-challenge",
                "v"
            ))]
        );
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = Arc::new(RecordingProvider {
            fail: true,
            ..RecordingProvider::default()
        });
        let auth = authenticator(provider.clone());
        let res = auth
            .perform("example.com", "_acme-challenge.example.com", "v")
            .await;
        assert!(matches!(res, Err(Error::Transport { status: 500 })));
    }

    #[tokio::test]
    async fn invalid_names_never_reach_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let auth = authenticator(provider.clone());

        let res = auth.perform("co.uk", "_acme-challenge.co.uk", "v").await;
        assert!(matches!(res, Err(Error::NoRegistrableDomain(_))));

        let res = auth
            .cleanup("example.com", "_acme-challenge.example.org", "v")
            .await;
        assert!(matches!(res, Err(Error::NotInDomain { .. })));

        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_configured_delay() {
        let provider = Arc::new(RecordingProvider::default());
        let auth = Authenticator::new(provider, SuffixList::builtin(), Duration::from_secs(120));
        let start = tokio::time::Instant::now();
        auth.wait_for_propagation().await;
        assert!(start.elapsed() >= Duration::from_secs(120));
    }
}
