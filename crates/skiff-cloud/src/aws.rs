#[derive(Debug, thiserror::Error)]
pub enum AwsError {
    #[error("aws CLI not found — install: https://aws.amazon.com/cli/")]
    NotFound { source: std::io::Error },

    #[error("aws command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("aws output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}

impl AwsError {
    /// Stderr of a failed command, if this error carries one.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            AwsError::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
