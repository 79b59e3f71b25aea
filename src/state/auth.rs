//! Login, logout and profile operations over the shared session.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Auth` pairs the `ApiClient` with its `SessionStore` and is what forms and
//! the CLI call. Every operation that talks to the server returns the typed
//! `ApiError` after surfacing a notice, so the caller can still map the
//! failure onto form fields.
//!
//! ERROR HANDLING
//! ==============
//! Failures never panic and never leave a half session behind: login either
//! persists token and user together or leaves the store cleared.
//! `refresh_user` is best-effort and only logs; `reload_user` reports.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use tokio::sync::watch;

use super::session::{SessionState, SessionStore};
use crate::net::error::{ApiError, ErrorKind};
use crate::net::http::ApiClient;
use crate::net::types::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, User,
    UserPatch,
};
use crate::net::{auth as auth_api, users as users_api};
use crate::util::notify::Notice;
use crate::util::storage::Credentials;

pub const MSG_LOGIN_FAILED: &str = "Erro ao fazer login";
pub const MSG_REGISTER_OK: &str = "Conta criada com sucesso! Faça login para continuar.";
pub const MSG_REGISTER_FAILED: &str = "Erro ao criar conta";
pub const MSG_LOGOUT: &str = "Logout realizado com sucesso";
pub const MSG_SESSION_NOT_SAVED: &str = "Não foi possível salvar a sessão.";
pub const MSG_PROFILE_UPDATED: &str = "Perfil atualizado com sucesso!";
pub const MSG_PROFILE_FAILED: &str = "Erro ao atualizar perfil";
pub const MSG_PASSWORD_CHANGED: &str = "Senha alterada com sucesso!";
pub const MSG_PASSWORD_FAILED: &str = "Erro ao alterar senha";
pub const MSG_RESET_SENT: &str = "Se o email estiver cadastrado, você receberá as instruções de recuperação.";
pub const MSG_RESET_REQUEST_FAILED: &str = "Erro ao solicitar recuperação de senha";
pub const MSG_RESET_OK: &str = "Senha redefinida com sucesso! Faça login com a nova senha.";
pub const MSG_RESET_FAILED: &str = "Erro ao redefinir senha";

/// Outcome of a route guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Session restore has not finished; show a spinner, decide later.
    Loading,
    RedirectToLogin,
    Forbidden,
    Granted,
}

/// The authentication operation set. Cheap to clone.
#[derive(Clone)]
pub struct Auth {
    api: ApiClient,
}

impl Auth {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session().snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session().subscribe()
    }

    /// Restore the persisted session at startup.
    pub fn initialize(&self) -> bool {
        self.session().initialize()
    }

    // =========================================================================
    // LOGIN / REGISTER / LOGOUT
    // =========================================================================

    /// Log in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` after notifying its message. Bad credentials
    /// come back as an `Auth` error carrying the server's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.session().set_loading(true);
        let request = LoginRequest { email: email.to_owned(), password: password.to_owned() };

        let reply = match auth_api::login(&self.api, &request).await {
            Ok(reply) => reply,
            Err(e) => {
                self.session().set_loading(false);
                tracing::info!(kind = ?e.kind, "login rejected");
                self.api.notifier().notify(Notice::error(e.message_or(MSG_LOGIN_FAILED)));
                return Err(e);
            }
        };

        let user = reply.user;
        let credentials = Credentials { token: reply.access_token, user: user.clone() };
        if let Err(e) = self.session().establish(credentials) {
            tracing::error!(error = %e, "failed to persist session");
            self.api.notifier().notify(Notice::error(MSG_SESSION_NOT_SAVED));
            return Err(ApiError::new(ErrorKind::Application, MSG_SESSION_NOT_SAVED));
        }

        tracing::info!(user_id = user.id, "logged in");
        self.api.notifier().notify(Notice::success(format!("Bem-vindo, {}!", user.name)));
        Ok(user)
    }

    /// Create an account. Does not log the new user in.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` after notifying its message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        match auth_api::register(&self.api, request).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "account created");
                self.api.notifier().notify(Notice::success(MSG_REGISTER_OK));
                Ok(user)
            }
            Err(e) => {
                self.api.notifier().notify(Notice::error(e.message_or(MSG_REGISTER_FAILED)));
                Err(e)
            }
        }
    }

    /// Drop the session locally. No network call.
    pub fn logout(&self) {
        self.session().teardown();
        tracing::info!("logged out");
        self.api.notifier().notify(Notice::info(MSG_LOGOUT));
    }

    // =========================================================================
    // USER
    // =========================================================================

    /// Shallow-merge into the cached user and re-persist. No-op without a
    /// session.
    pub fn update_user(&self, patch: &UserPatch) -> bool {
        self.session().merge_user(patch)
    }

    /// Re-fetch the current user and overwrite the cached copy. Failures are
    /// logged only and leave the session as it was, except that a 401 still
    /// goes through the client's global teardown.
    pub async fn refresh_user(&self) -> Option<User> {
        if !self.state().is_authenticated() {
            return None;
        }
        match self.reload_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind, "failed to refresh user");
                None
            }
        }
    }

    /// Like `refresh_user`, but hands the failure back to the caller.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` from `GET /users/me`; the cached user is kept.
    pub async fn reload_user(&self) -> Result<User, ApiError> {
        let user = users_api::me(&self.api).await?;
        self.session().replace_user(user.clone());
        Ok(user)
    }

    /// Save profile fields on the server and cache the reply.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` after notifying its message.
    pub async fn update_profile(&self, patch: &UserPatch) -> Result<User, ApiError> {
        match users_api::update_me(&self.api, patch).await {
            Ok(user) => {
                self.session().replace_user(user.clone());
                self.api.notifier().notify(Notice::success(MSG_PROFILE_UPDATED));
                Ok(user)
            }
            Err(e) => {
                self.api.notifier().notify(Notice::error(e.message_or(MSG_PROFILE_FAILED)));
                Err(e)
            }
        }
    }

    /// # Errors
    ///
    /// Returns the `ApiError` after notifying its message.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ApiError> {
        let request = ChangePasswordRequest { current_password: current.to_owned(), new_password: new.to_owned() };
        self.notify_outcome(users_api::change_password(&self.api, &request).await, MSG_PASSWORD_CHANGED, MSG_PASSWORD_FAILED)
    }

    /// Request a password reset email. The server answers the same way for
    /// unknown addresses.
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` after notifying its message.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let request = ForgotPasswordRequest { email: email.to_owned() };
        self.notify_outcome(auth_api::forgot_password(&self.api, &request).await, MSG_RESET_SENT, MSG_RESET_REQUEST_FAILED)
    }

    /// # Errors
    ///
    /// Returns the `ApiError` after notifying its message.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.notify_outcome(auth_api::reset_password(&self.api, request).await, MSG_RESET_OK, MSG_RESET_FAILED)
    }

    fn notify_outcome(&self, result: Result<String, ApiError>, ok: &str, fallback: &str) -> Result<(), ApiError> {
        match result {
            Ok(reply) => {
                tracing::debug!(%reply, "server confirmed");
                self.api.notifier().notify(Notice::success(ok));
                Ok(())
            }
            Err(e) => {
                self.api.notifier().notify(Notice::error(e.message_or(fallback)));
                Err(e)
            }
        }
    }

    // =========================================================================
    // GUARDS
    // =========================================================================

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state().user().is_some_and(User::is_admin)
    }

    /// Decide whether a protected view may render.
    #[must_use]
    pub fn access(&self, require_admin: bool) -> Access {
        let state = self.state();
        if state.is_loading() {
            return Access::Loading;
        }
        match state.user() {
            None => Access::RedirectToLogin,
            Some(user) if require_admin && !user.is_admin() => Access::Forbidden,
            Some(_) => Access::Granted,
        }
    }
}
