//! Error types.

/// Error enumerates the possible Dina Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the Dinahosting API answers with any HTTP status other than 200 (OK).
    #[error("HTTP Error {status}")]
    Transport { status: u16 },

    /// Returned when the Dinahosting API answers HTTP 200 (OK) with a body that isn't JSON.
    /// The raw response text is kept for diagnosis.
    #[error("API response with non JSON: {body}")]
    MalformedResponse { body: String },

    /// Returned when a [`ResponseValidator`][crate::provider::validator::ResponseValidator]
    /// installed on the [`ProviderClient`][crate::provider::ProviderClient] refuses an otherwise
    /// well-formed response.
    #[error("API response rejected: {0}")]
    Rejected(String),

    /// Returned when the request can't be delivered, or the response body can't be read.
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Returned when a credentials file is missing its username or password entry.
    #[error("credentials file has no \"{0}\" entry")]
    MissingCredential(&'static str),

    /// Returned when a name has no label beyond its public suffix, e.g. `co.uk`.
    #[error("\"{0}\" has no registrable domain")]
    NoRegistrableDomain(String),

    /// Returned when a challenge validation name isn't a subdomain of the registrable domain it
    /// is expected to be created under.
    #[error("\"{name}\" is not a subdomain of \"{domain}\"")]
    NotInDomain { name: String, domain: String },

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when processing JSON from disk (e.g.
    /// [trying to load a `Config`][crate::config::Config::try_from_file]) fails due to invalid
    /// JSON content, or when a request envelope can't be serialized.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),
}
