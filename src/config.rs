use crate::authenticator::{Authenticator, DEFAULT_PROPAGATION};
use crate::credentials::Credentials;
use crate::domain::SuffixList;
use crate::error::Error;
use crate::provider::validator::{response_code, DINAHOSTING_SUCCESS};
use crate::provider::ProviderClient;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub credentials: PathBuf,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_propagation")]
    pub propagation_seconds: Duration,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub public_suffix_list: Option<PathBuf>,
    #[serde(default)]
    pub extra_public_suffixes: Vec<String>,
    #[serde(default)]
    pub strict_response: bool,
}

fn default_propagation() -> Duration {
    DEFAULT_PROPAGATION
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        Ok(conf)
    }

    /// Build a [`ProviderClient`] authenticated with the configured credentials file.
    pub async fn provider(&self) -> Result<ProviderClient, Error> {
        let credentials = Credentials::try_from_file(&self.credentials).await?;
        let client = match &self.api_url {
            Some(url) => ProviderClient::with_endpoint(credentials, url.as_str())?,
            None => ProviderClient::new(credentials)?,
        };
        Ok(if self.strict_response {
            client.with_validator(response_code(DINAHOSTING_SUCCESS))
        } else {
            client
        })
    }

    /// The configured public suffix rules: the bundled list, or the rules of the
    /// `public_suffix_list` file when one is set, plus any `extra_public_suffixes`.
    pub async fn suffix_list(&self) -> Result<SuffixList, Error> {
        let mut list = match &self.public_suffix_list {
            Some(path) => SuffixList::from_dat(&tokio::fs::read_to_string(path).await?),
            None => SuffixList::builtin(),
        };
        list.extend(&self.extra_public_suffixes);
        Ok(list)
    }

    pub async fn authenticator(&self) -> Result<Authenticator, Error> {
        let provider = Arc::new(self.provider().await?);
        Ok(Authenticator::new(
            provider,
            self.suffix_list().await?,
            self.propagation_seconds,
        ))
    }
}
