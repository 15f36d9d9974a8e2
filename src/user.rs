//! User Account
//!
//! Credentials entered on the login screen and the account actions that
//! use them. A successful login hands the issued token to the session.

use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::commands::{self, Transport};
use crate::context::Session;
use crate::error::{GroceryError, GroceryResult};

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LABEL_LEN: usize = 63;

const EMAIL_PATTERN: &str = r"^[-!#$%&'*+/0-9=?A-Z^_a-z`{|}~](\.?[-!#$%&'*+/0-9=?A-Z^_a-z`{|}~])*@[a-zA-Z0-9](-*\.?[a-zA-Z0-9])*\.[a-zA-Z](-?[a-zA-Z0-9])+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN)).as_ref().ok()
}

/// Syntactic email check, as done before registering or resetting a password
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.len() > MAX_LOCAL_PART_LEN {
        return false;
    }
    if domain.split('.').any(|label| label.len() > MAX_DOMAIN_LABEL_LEN) {
        return false;
    }
    email_regex().is_some_and(|re| re.is_match(email))
}

/// The login form: an email address doubling as username, and a password
pub struct UserAccount {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    pub email: String,
    pub password: String,
}

impl UserAccount {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            session,
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn is_valid_email(&self) -> bool {
        is_valid_email(&self.email)
    }

    /// Exchange the credentials for a token and sign the session in
    pub async fn login(&self) -> GroceryResult<()> {
        let token = commands::login(&*self.transport, &self.email, &self.password).await?;
        self.session.set_token(token).await?;
        log::info!("Signed in as {}", self.email);
        Ok(())
    }

    /// Create an account; does not sign in
    pub async fn register(&self) -> GroceryResult<()> {
        self.require_valid_email()?;
        commands::register(&*self.transport, &self.email, &self.password).await?;
        log::info!("Registered account {}", self.email);
        Ok(())
    }

    pub async fn reset_password(&self) -> GroceryResult<()> {
        self.require_valid_email()?;
        commands::reset_password(&*self.transport, &self.email).await?;
        log::info!("Password reset requested for {}", self.email);
        Ok(())
    }

    fn require_valid_email(&self) -> GroceryResult<()> {
        if self.is_valid_email() {
            Ok(())
        } else {
            Err(GroceryError::InvalidEmail(self.email.clone()))
        }
    }
}
