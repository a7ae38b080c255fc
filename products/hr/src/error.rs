use platform_authz::AuthzError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HrError {
    #[error("unknown employee {0}")]
    UnknownEmployee(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Forbidden(#[from] AuthzError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no attendance recorded for today")]
    NoAttendanceToday,
}

impl HrError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type HrResult<T> = Result<T, HrError>;
