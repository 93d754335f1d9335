use thiserror::Error;

#[derive(Debug, Error)]
pub enum MewError {
    #[error("config invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("working root does not exist: {0}")]
    MissingRoot(String),
    #[error("target media dir unavailable: {0}")]
    TargetDirUnavailable(String),
    #[error("failed to move {from} to {to}: {reason}")]
    MoveFailed {
        from: String,
        to: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnCode {
    W001SourceMissing,
    W002MoveFailed,
    W003DocumentUnreadable,
    W004DocumentUnwritable,
    W005UnknownEnv,
}

impl WarnCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W001SourceMissing => "W001_SOURCE_MISSING",
            Self::W002MoveFailed => "W002_MOVE_FAILED",
            Self::W003DocumentUnreadable => "W003_DOCUMENT_UNREADABLE",
            Self::W004DocumentUnwritable => "W004_DOCUMENT_UNWRITABLE",
            Self::W005UnknownEnv => "W005_UNKNOWN_ENV",
        }
    }
}
