//! Error Types
//!
//! One error enum for every client operation, plus the classification and
//! message catalog callers use to report failures to the user.

use thiserror::Error;

/// Common result type for client operations
pub type GroceryResult<T> = Result<T, GroceryError>;

/// Client-level errors
#[derive(Debug, Error)]
pub enum GroceryError {
    /// The request never produced a response
    #[error("Network request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("Request failed: {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// The backend rejected the credential (403); the session is already signed out
    #[error("Credential rejected: {status_text}")]
    AuthExpired { status_text: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// An authorized operation was attempted without a credential
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Index {index} out of range for list of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Grocery name must not be empty")]
    EmptyName,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for GroceryError {
    fn from(err: reqwest::Error) -> Self {
        GroceryError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GroceryError {
    fn from(err: serde_json::Error) -> Self {
        GroceryError::Decode(err.to_string())
    }
}

/// Coarse error classes, used to pick what to tell the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Server,
    AuthExpired,
    InvalidResponse,
    SignedOut,
    InvalidInput,
    Local,
}

impl GroceryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GroceryError::Transport(_) => ErrorKind::Network,
            GroceryError::Http { .. } => ErrorKind::Server,
            GroceryError::AuthExpired { .. } => ErrorKind::AuthExpired,
            GroceryError::Decode(_) => ErrorKind::InvalidResponse,
            GroceryError::NotSignedIn => ErrorKind::SignedOut,
            GroceryError::IndexOutOfRange { .. }
            | GroceryError::EmptyName
            | GroceryError::InvalidEmail(_) => ErrorKind::InvalidInput,
            GroceryError::Config(_) | GroceryError::Io(_) => ErrorKind::Local,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GroceryError::Http { status, .. } => Some(*status),
            GroceryError::AuthExpired { .. } => Some(403),
            _ => None,
        }
    }

    /// Whether the caller should send the user back to the login screen
    pub fn requires_sign_in(&self) -> bool {
        matches!(self.kind(), ErrorKind::AuthExpired | ErrorKind::SignedOut)
    }
}

// ========================
// Message Catalog
// ========================

/// What the user was doing when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Add,
    Update,
    Restore,
    Login,
    Register,
    ResetPassword,
}

/// User-facing alert text for a failed action
pub fn user_message(action: Action, kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::AuthExpired => return "Your session has expired. Please sign in again.",
        ErrorKind::SignedOut => return "Please sign in to continue.",
        ErrorKind::Network => return "Unable to reach the server. Check your connection and try again.",
        _ => {}
    }

    match (action, kind) {
        (Action::Add, ErrorKind::InvalidInput) => "Enter a grocery item to add.",
        (Action::Register | Action::ResetPassword, ErrorKind::InvalidInput) => {
            "Enter a valid email address."
        }
        (Action::Load, _) => "An error occurred while loading your grocery list.",
        (Action::Add, _) => "An error occurred while adding an item to your list.",
        (Action::Update, _) => "An error occurred while updating your list.",
        (Action::Restore, _) => "An error occurred while adding an item to your list.",
        (Action::Login, _) => "Unfortunately we could not find your account.",
        (Action::Register, _) => "Unfortunately we were unable to create your account.",
        (Action::ResetPassword, _) => "Unfortunately, an error occurred resetting your password.",
    }
}
