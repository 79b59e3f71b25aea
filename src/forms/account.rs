//! Profile and password forms for a logged-in user.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use validator::{Validate, ValidationError};

use super::{PHONE_RE, check, non_blank, rule, strong_password};
use crate::net::error::ApiError;
use crate::net::types::{User, UserPatch};
use crate::state::auth::Auth;

pub const MSG_CURRENT_PASSWORD_REQUIRED: &str = "Senha atual é obrigatória";

fn required_current(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() { Err(rule("required", MSG_CURRENT_PASSWORD_REQUIRED)) } else { Ok(()) }
}

/// Editable profile fields. `None` leaves a field as it is.
#[derive(Clone, Debug, Default, Validate)]
pub struct ProfileForm {
    #[validate(length(max = 255, message = "Nome deve ter no máximo 255 caracteres"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Email deve ter formato válido"),
        length(max = 255, message = "Email deve ter no máximo 255 caracteres")
    )]
    pub email: Option<String>,
    #[validate(
        regex(path = *PHONE_RE, code = "phone", message = "Telefone deve ter formato válido"),
        length(max = 50, message = "Telefone deve ter no máximo 50 caracteres")
    )]
    pub phone: Option<String>,
    #[validate(length(max = 1024, message = "URL do avatar deve ter no máximo 1024 caracteres"))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 1000, message = "Bio deve ter no máximo 1000 caracteres"))]
    pub bio: Option<String>,
}

impl ProfileForm {
    /// Form prefilled from the cached user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            phone: user.phone.clone(),
            avatar_url: user.avatar_url.clone(),
            bio: user.bio.clone(),
        }
    }

    /// Inputs trimmed, with blank ones turned into `None`. This is the form
    /// that gets validated and sent, so a cleared field means "unchanged".
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: non_blank(self.name.as_deref()),
            email: non_blank(self.email.as_deref()),
            phone: non_blank(self.phone.as_deref()),
            avatar_url: non_blank(self.avatar_url.as_deref()),
            bio: non_blank(self.bio.as_deref()),
        }
    }

    /// The patch to send. Blank inputs are treated as unset.
    #[must_use]
    pub fn patch(&self) -> UserPatch {
        let form = self.normalized();
        UserPatch {
            name: form.name,
            email: form.email,
            phone: form.phone,
            avatar_url: form.avatar_url,
            bio: form.bio,
            roles: None,
        }
    }

    /// # Errors
    ///
    /// `Validation` without a network call, else the server failure.
    pub async fn submit(&self, auth: &Auth) -> Result<User, ApiError> {
        check(&self.normalized())?;
        auth.update_profile(&self.patch()).await
    }
}

#[derive(Clone, Debug, Default, Validate)]
pub struct ChangePasswordForm {
    #[validate(custom(function = "required_current"))]
    pub current_password: String,
    #[validate(custom(function = "strong_password"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Senhas devem ser iguais"))]
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// # Errors
    ///
    /// `Validation` without a network call, else the server failure with
    /// the `current_password` field flagged when the server rejected it.
    pub async fn submit(&self, auth: &Auth) -> Result<(), ApiError> {
        check(self)?;
        auth.change_password(&self.current_password, &self.new_password).await.map_err(|e| {
            if e.server_provided && e.message.to_lowercase().contains("senha atual") {
                let message = e.message.clone();
                e.with_field("current_password", message)
            } else {
                e
            }
        })
    }
}
