//! Checkout and contact forms.

#[cfg(test)]
#[path = "storefront_test.rs"]
mod storefront_test;

use validator::{Validate, ValidationError};

use super::{check, non_blank, rule};
use crate::net::error::{ApiError, ErrorKind, FieldErrors};
use crate::net::messages;
use crate::net::tickets;
use crate::net::types::{ContactMessage, DEFAULT_PAYMENT_METHOD, Event, NewMessage, PurchaseRequest, Ticket};
use crate::state::auth::Auth;
use crate::util::notify::Notice;

pub const MSG_LOGIN_REQUIRED: &str = "Faça login para comprar ingressos";
pub const MSG_PURCHASE_OK: &str = "Compra realizada com sucesso!";
pub const MSG_PURCHASE_FAILED: &str = "Erro ao processar compra. Tente novamente.";
pub const MSG_MESSAGE_SENT: &str = "Mensagem enviada com sucesso!";
pub const MSG_MESSAGE_FAILED: &str = "Erro ao enviar mensagem";

fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { Err(rule("required", "Texto é obrigatório")) } else { Ok(()) }
}

// =============================================================================
// PURCHASE
// =============================================================================

/// Ticket checkout for one event.
#[derive(Clone, Debug, Validate)]
pub struct PurchaseForm {
    pub event_id: i64,
    #[validate(range(min = 1, message = "Quantidade deve ser pelo menos 1"))]
    pub quantity: u32,
    /// Stock as last seen; `None` skips the upper bound.
    pub tickets_available: Option<i32>,
}

impl PurchaseForm {
    #[must_use]
    pub fn for_event(event: &Event, quantity: u32) -> Self {
        Self { event_id: event.id, quantity, tickets_available: event.tickets_available }
    }

    /// Path of the purchase detail view for a bought ticket.
    #[must_use]
    pub fn receipt_path(ticket: &Ticket) -> String {
        format!("/compras/{}", ticket.id)
    }

    /// Validate quantity against the field rule and the known stock.
    ///
    /// # Errors
    ///
    /// `Validation` with a `quantity` message.
    pub fn validate_stock(&self) -> Result<(), ApiError> {
        check(self)?;
        match self.tickets_available {
            Some(available) if i64::from(self.quantity) > i64::from(available) => {
                let mut fields = FieldErrors::new();
                fields.insert("quantity".to_owned(), format!("Ingressos insuficientes. Disponível: {available}"));
                Err(ApiError::validation(fields))
            }
            _ => Ok(()),
        }
    }

    /// Buy as the logged-in user. Anonymous callers are sent to the login
    /// view instead.
    ///
    /// # Errors
    ///
    /// `Auth` when nobody is logged in, `Validation` for a bad quantity,
    /// else the server failure after notifying it.
    pub async fn submit(&self, auth: &Auth) -> Result<Ticket, ApiError> {
        let api = auth.api();
        let Some(user_id) = auth.state().user().map(|u| u.id) else {
            api.navigator().navigate(api.login_path());
            return Err(ApiError::new(ErrorKind::Auth, MSG_LOGIN_REQUIRED));
        };
        self.validate_stock()?;

        let request = PurchaseRequest {
            user_id,
            event_id: self.event_id,
            quantity: self.quantity,
            payment_method: Some(DEFAULT_PAYMENT_METHOD.to_owned()),
        };
        match tickets::purchase(api, &request).await {
            Ok(ticket) => {
                tracing::info!(ticket_id = ticket.id, event_id = self.event_id, quantity = self.quantity, "tickets purchased");
                api.notifier().notify(Notice::success(MSG_PURCHASE_OK));
                api.navigator().navigate(&Self::receipt_path(&ticket));
                Ok(ticket)
            }
            Err(e) => {
                api.notifier().notify(Notice::error(e.message_or(MSG_PURCHASE_FAILED)));
                Err(e)
            }
        }
    }
}

// =============================================================================
// CONTACT
// =============================================================================

#[derive(Clone, Debug, Default, Validate)]
pub struct ContactForm {
    #[validate(length(max = 255, message = "Remetente deve ter no máximo 255 caracteres"))]
    pub sender: Option<String>,
    #[validate(custom(function = "required_text"))]
    pub text: String,
    #[validate(
        email(message = "Email deve ter formato válido"),
        length(max = 255, message = "Email de contato deve ter no máximo 255 caracteres")
    )]
    pub contact_email: Option<String>,
}

impl ContactForm {
    /// Inputs trimmed, with blank optional ones turned into `None`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            sender: non_blank(self.sender.as_deref()),
            text: self.text.trim().to_owned(),
            contact_email: non_blank(self.contact_email.as_deref()),
        }
    }

    #[must_use]
    pub fn message(&self) -> NewMessage {
        let form = self.normalized();
        NewMessage { sender: form.sender, text: form.text, contact_email: form.contact_email }
    }

    /// Post the message. Works with or without a session.
    ///
    /// # Errors
    ///
    /// `Validation` without a network call, else the server failure after
    /// notifying it.
    pub async fn submit(&self, auth: &Auth) -> Result<ContactMessage, ApiError> {
        check(&self.normalized())?;
        let api = auth.api();
        match messages::create(api, &self.message()).await {
            Ok(created) => {
                api.notifier().notify(Notice::success(MSG_MESSAGE_SENT));
                Ok(created)
            }
            Err(e) => {
                api.notifier().notify(Notice::error(e.message_or(MSG_MESSAGE_FAILED)));
                Err(e)
            }
        }
    }
}
