use thiserror::Error;

#[derive(Debug, Error)]
pub enum NvmexError {
    #[error("failed to run `{command}`: {reason}")]
    Execution { command: String, reason: String },
    #[error("`{command}` did not finish within {seconds}s")]
    Timeout { command: String, seconds: u64 },
    #[error("invalid output from {context}: {reason}")]
    Parse { context: String, reason: String },
    #[error("missing field {field} in smart-log for {device}")]
    MissingField { field: String, device: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("internal error: {0}")]
    InternalError(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NvmexError {
    /// Coarse error class used as a structured logging field.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Execution { .. } | Self::Timeout { .. } => "execution",
            Self::Parse { .. } | Self::MissingField { .. } => "parse",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InternalError(_) | Self::Io(_) => "internal",
        }
    }

    pub fn is_execution(&self) -> bool {
        self.class() == "execution"
    }

    pub fn is_parse(&self) -> bool {
        self.class() == "parse"
    }
}

pub type Result<T> = std::result::Result<T, NvmexError>;
