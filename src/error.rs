use thiserror::Error;

/// Everything that can end a reconciliation run early.
///
/// Per-record rejections from the provider are deliberately not in here;
/// they are reported through `dns::api::PutOutcome` so sibling records
/// keep processing.
#[derive(Debug, Error)]
pub(crate) enum UpdateError {
    #[error("connection failed: {0}")]
    Connection(#[source] attohttpc::Error),

    #[error("HTTP error from {service}: {status}")]
    Http {
        service: &'static str,
        status: String,
    },

    #[error("unexpected response from {service}: {source}")]
    Api {
        service: &'static str,
        #[source]
        source: attohttpc::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The one fixed user-visible line logged for an error before the process
/// exits.
pub(crate) fn terminal_message(err: &UpdateError) -> &'static str {
    match err {
        UpdateError::Connection(_) => "Connection failed, please check Internet connection",
        UpdateError::Http { .. } => "Unexpected data received, check authentication settings",
        UpdateError::Config(_) => "Invalid configuration, please check the configuration file",
        _ => "Something went wrong, see the error below",
    }
}
