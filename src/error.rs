//! Error types for import resolution and configuration parsing.

use thiserror::Error;

/// Errors returned by [`Importer::import`](crate::Importer::import).
///
/// Only `NotFound` means the import does not exist anywhere on the search
/// path. The other variants are hard fetch errors: they abort the candidate
/// search at the location they name, and they are never cached, so an
/// identical later request retries the fetch.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The whole candidate list was exhausted without content. Carries the
    /// unresolved import specifier, as no candidate location succeeded.
    #[error("could not read {spec:?}: not found")]
    NotFound { spec: String },

    /// A local filesystem read failed for a reason other than the file not
    /// existing (permissions, reading a directory, ...).
    #[error("could not open {location:?}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A network fetch completed with a status other than 200 or 404.
    #[error("could not fetch {location:?}: {status}")]
    Status { location: String, status: String },

    /// A network fetch failed below the HTTP layer (connection, TLS, or
    /// reading the response body).
    #[error("could not fetch {location:?}: {message}")]
    Transport { location: String, message: String },
}

/// Errors from parsing `key[=value]` variable definitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The definition has no key before the `=`.
    #[error("missing key in {input:?}")]
    MissingKey { input: String },

    /// The definition omitted `=value` and the key is not set in the
    /// process environment.
    #[error("missing value: {key}")]
    MissingValue { key: String },
}
