//! Login, registration and password recovery forms.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use validator::{Validate, ValidationError};

use super::{check, required_email, required_password, rule, strong_password};
use crate::net::error::ApiError;
use crate::net::types::{RegisterRequest, ResetPasswordRequest, User};
use crate::state::auth::{Auth, MSG_LOGIN_FAILED, MSG_REGISTER_FAILED};

pub const MSG_BAD_CREDENTIALS: &str = "Email ou senha incorretos";
pub const MSG_EMAIL_TAKEN: &str = "Este email já está em uso";
pub const MSG_CONFIRM_REQUIRED: &str = "Confirmação de senha é obrigatória";
pub const MSG_TOKEN_REQUIRED: &str = "Token é obrigatório";

fn name_rule(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    match len {
        0 => Err(rule("required", "Nome é obrigatório")),
        1 => Err(rule("length", "Nome deve ter pelo menos 2 caracteres")),
        256.. => Err(rule("length", "Nome deve ter no máximo 255 caracteres")),
        _ => Ok(()),
    }
}

fn required_confirmation(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() { Err(rule("required", MSG_CONFIRM_REQUIRED)) } else { Ok(()) }
}

fn required_token(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { Err(rule("required", MSG_TOKEN_REQUIRED)) } else { Ok(()) }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Clone, Debug, Default, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "required_email"), email(message = "Email deve ter formato válido"))]
    pub email: String,
    #[validate(custom(function = "required_password"))]
    pub password: String,
}

impl LoginForm {
    /// The form as submitted: email trimmed, password untouched.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self { email: self.email.trim().to_owned(), password: self.password.clone() }
    }

    /// Validate, then log in through `auth`.
    ///
    /// # Errors
    ///
    /// `Validation` without a network call when a field is invalid.
    /// Otherwise the login failure, with the `password` field flagged when
    /// the server rejected the credentials.
    pub async fn submit(&self, auth: &Auth) -> Result<User, ApiError> {
        let form = self.normalized();
        check(&form)?;
        auth.login(&form.email, &form.password).await.map_err(flag_bad_credentials)
    }
}

/// Flag the password field when the server message points at the
/// credentials.
#[must_use]
pub fn flag_bad_credentials(error: ApiError) -> ApiError {
    let message = error.message_or(MSG_LOGIN_FAILED).to_lowercase();
    if message.contains("credenciais") || message.contains("senha") {
        error.with_field("password", MSG_BAD_CREDENTIALS)
    } else {
        error
    }
}

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Clone, Debug, Default, Validate)]
pub struct RegisterForm {
    #[validate(custom(function = "name_rule"))]
    pub name: String,
    #[validate(
        custom(function = "required_email"),
        email(message = "Email deve ter formato válido"),
        length(max = 255, message = "Email deve ter no máximo 255 caracteres")
    )]
    pub email: String,
    #[validate(custom(function = "strong_password"))]
    pub password: String,
    #[validate(
        custom(function = "required_confirmation"),
        must_match(other = "password", message = "Senhas devem ser iguais")
    )]
    pub confirm_password: String,
}

impl RegisterForm {
    /// The form as submitted: name and email trimmed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self { name: self.name.trim().to_owned(), email: self.email.trim().to_owned(), ..self.clone() }
    }

    #[must_use]
    pub fn request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
        }
    }

    /// Validate, then create the account. Does not log in.
    ///
    /// # Errors
    ///
    /// `Validation` without a network call when a field is invalid.
    /// Otherwise the registration failure, with the `email` field flagged
    /// when the address is taken.
    pub async fn submit(&self, auth: &Auth) -> Result<User, ApiError> {
        let form = self.normalized();
        check(&form)?;
        auth.register(&form.request()).await.map_err(flag_email_taken)
    }
}

/// Flag the email field when the server says the address is in use.
#[must_use]
pub fn flag_email_taken(error: ApiError) -> ApiError {
    let message = error.message_or(MSG_REGISTER_FAILED).to_lowercase();
    if message.contains("email") && message.contains("uso") {
        error.with_field("email", MSG_EMAIL_TAKEN)
    } else {
        error
    }
}

// =============================================================================
// PASSWORD RECOVERY
// =============================================================================

#[derive(Clone, Debug, Default, Validate)]
pub struct ForgotPasswordForm {
    #[validate(
        custom(function = "required_email"),
        email(message = "Email deve ter formato válido"),
        length(max = 255, message = "Email deve ter no máximo 255 caracteres")
    )]
    pub email: String,
}

impl ForgotPasswordForm {
    /// # Errors
    ///
    /// `Validation` without a network call, else the server failure.
    pub async fn submit(&self, auth: &Auth) -> Result<(), ApiError> {
        let email = self.email.trim();
        check(&Self { email: email.to_owned() })?;
        auth.forgot_password(email).await
    }
}

/// Reset with the emailed token. `email` and `token` usually come from the
/// link the user followed.
#[derive(Clone, Debug, Default, Validate)]
pub struct ResetPasswordForm {
    #[validate(custom(function = "required_email"), email(message = "Email deve ter formato válido"))]
    pub email: String,
    #[validate(custom(function = "required_token"))]
    pub token: String,
    #[validate(custom(function = "strong_password"))]
    pub new_password: String,
    #[validate(
        custom(function = "required_confirmation"),
        must_match(other = "new_password", message = "Senhas devem ser iguais")
    )]
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// # Errors
    ///
    /// `Validation` without a network call, else the server failure.
    pub async fn submit(&self, auth: &Auth) -> Result<(), ApiError> {
        let form = Self { email: self.email.trim().to_owned(), token: self.token.trim().to_owned(), ..self.clone() };
        check(&form)?;
        let request = ResetPasswordRequest { email: form.email, token: form.token, new_password: form.new_password };
        auth.reset_password(&request).await
    }
}
