//! User Commands
//!
//! Bindings for authentication and account management. None of these
//! carry a bearer token.

use serde::Serialize;

use super::{send_anonymous, ApiRequest, Transport};
use crate::error::GroceryResult;
use crate::models::{AccessToken, Envelope};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct LoginArgs<'a> {
    username: &'a str,
    password: &'a str,
    grant_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterArgs<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResetPasswordArgs<'a> {
    email: &'a str,
}

// ========================
// Commands
// ========================

/// Exchange credentials for an access token
pub async fn login(transport: &dyn Transport, email: &str, password: &str) -> GroceryResult<String> {
    let body = serde_json::to_value(LoginArgs {
        username: email,
        password,
        grant_type: "password",
    })?;
    let response = send_anonymous(transport, ApiRequest::post("oauth/token", body)).await?;
    let envelope: Envelope<AccessToken> = response.json()?;
    Ok(envelope.result.access_token)
}

/// Create an account; the email doubles as the username
pub async fn register(transport: &dyn Transport, email: &str, password: &str) -> GroceryResult<()> {
    let body = serde_json::to_value(RegisterArgs {
        username: email,
        email,
        password,
    })?;
    send_anonymous(transport, ApiRequest::post("Users", body)).await?;
    Ok(())
}

/// Ask the backend to email a password reset link
pub async fn reset_password(transport: &dyn Transport, email: &str) -> GroceryResult<()> {
    let body = serde_json::to_value(ResetPasswordArgs { email })?;
    send_anonymous(transport, ApiRequest::post("Users/resetpassword", body)).await?;
    Ok(())
}
