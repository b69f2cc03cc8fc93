/// Result alias that carries the custom [`AirglowError`] type.
pub type Result<T> = std::result::Result<T, AirglowError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum AirglowError {
    /// Free-form error used by subsystems without a richer taxonomy.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Failure while encoding or decoding JSON payloads.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Failure while talking to the station status endpoint.
    #[error("station request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Failure inside the frequency analysis transform.
    #[error("{0}")]
    Fft(#[from] realfft::FftError),
}

impl AirglowError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for AirglowError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for AirglowError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
