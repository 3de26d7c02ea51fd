/// Alias for `Result<T, OracleError>`.
pub type OracleResult<T> = Result<T, OracleError>;

/// Errors that can occur when consulting an oracle.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// No API key was configured.
    #[error("API key not configured")]
    NoApiKey,

    /// The request never reached the API or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, usually a JSON error document.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The client was misconfigured.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A scripted oracle ran out of replies.
    #[error("no scripted reply left")]
    ScriptExhausted,
}
