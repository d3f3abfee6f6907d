use thiserror::Error;

pub const CAUSE_SIGNUP_REQUIRED: &str = "Required user_id and password";
pub const CAUSE_LENGTH: &str = "Input length is incorrect";
pub const CAUSE_PATTERN: &str = "Incorrect character pattern";
pub const CAUSE_DUPLICATE: &str = "Already same user_id is used";
pub const CAUSE_UPDATE_REQUIRED: &str = "Required nickname or comment";
pub const CAUSE_UPDATE_LIMIT: &str = "String length limit exceeded";

/// Which operation a validation failure belongs to; selects the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Signup,
    Update,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Signup => "Account creation failed",
            Operation::Update => "User updation failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("{message}: {cause}", message = .op.failure_message())]
    Validation { op: Operation, cause: &'static str },

    #[error("Account creation failed: Already same user_id is used")]
    DuplicateUser,

    #[error("Authentication failed")]
    AuthFailure,

    #[error("No user found")]
    NotFound,

    #[error("No permission for update")]
    Forbidden,
}

impl DirectoryError {
    pub fn signup(cause: &'static str) -> Self {
        DirectoryError::Validation { op: Operation::Signup, cause }
    }

    pub fn update(cause: &'static str) -> Self {
        DirectoryError::Validation { op: Operation::Update, cause }
    }

    /// Top-level `message` of the error envelope.
    pub fn message(&self) -> &'static str {
        match self {
            DirectoryError::Validation { op, .. } => op.failure_message(),
            DirectoryError::DuplicateUser => Operation::Signup.failure_message(),
            DirectoryError::AuthFailure => "Authentication failed",
            DirectoryError::NotFound => "No user found",
            DirectoryError::Forbidden => "No permission for update",
        }
    }

    /// Specific rule violated, only for 400-class errors.
    pub fn cause(&self) -> Option<&'static str> {
        match self {
            DirectoryError::Validation { cause, .. } => Some(cause),
            DirectoryError::DuplicateUser => Some(CAUSE_DUPLICATE),
            _ => None,
        }
    }
}
