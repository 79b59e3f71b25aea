//! Wire DTOs for the storefront API.
//!
//! DESIGN
//! ======
//! The backend speaks Portuguese camelCase JSON (`nome`, `dataHora`,
//! `ingressos`). Rust-side names are English; serde renames keep the wire
//! format lossless. Optional response fields default to `None` because the
//! same entity comes back in several trimmed shapes (the login reply carries
//! a shorter user than `/users/me`).

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role that unlocks admin-only operations.
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

// =============================================================================
// USERS & AUTH
// =============================================================================

/// An account as returned by `/auth/login` and `/users/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "avatarUrl", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Shallow-merge the set fields of `patch` into this user.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(avatar_url) = &patch.avatar_url {
            self.avatar_url = Some(avatar_url.clone());
        }
        if let Some(bio) = &patch.bio {
            self.bio = Some(bio.clone());
        }
        if let Some(roles) = &patch.roles {
            self.roles.clone_from(roles);
        }
    }
}

/// Partial user for local merges and `PUT /users/me`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "avatarUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Local-only; never sent to the server.
    #[serde(skip)]
    pub roles: Option<BTreeSet<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "expiresIn", default)]
    pub expires_in: Option<i64>,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// =============================================================================
// EVENTS
// =============================================================================

/// A performance space attached to an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "capacidade", default)]
    pub capacity: Option<i32>,
    #[serde(rename = "disponivel", default)]
    pub available: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "local", default)]
    pub location: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    /// ISO-8601 local date-time as sent by the server.
    #[serde(rename = "dataHora")]
    pub starts_at: String,
    #[serde(rename = "duracaoMin", default)]
    pub duration_min: Option<i32>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "totalTickets", default)]
    pub total_tickets: Option<i32>,
    #[serde(rename = "ticketsAvailable", default)]
    pub tickets_available: Option<i32>,
    #[serde(rename = "imagemUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "espaco", default)]
    pub venue: Option<Venue>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

/// Query parameters for `GET /eventos`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EventFilter {
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "dataInicio", skip_serializing_if = "Option::is_none")]
    pub starts_after: Option<String>,
    #[serde(rename = "dataFim", skip_serializing_if = "Option::is_none")]
    pub starts_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl EventFilter {
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = Some(page.page);
        self.size = Some(page.size);
        self
    }
}

/// Body for admin event create/update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EventDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "local", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "dataHora")]
    pub starts_at: String,
    #[serde(rename = "duracaoMin", skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<i32>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "totalTickets", skip_serializing_if = "Option::is_none")]
    pub total_tickets: Option<i32>,
    #[serde(rename = "imagemUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "espacoId", skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<i64>,
}

// =============================================================================
// TICKETS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Active,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Event summary embedded in a ticket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketEvent {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "local", default)]
    pub location: Option<String>,
    #[serde(rename = "dataHora", default)]
    pub starts_at: Option<String>,
    #[serde(rename = "preco", default)]
    pub price: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketOwner {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    #[serde(rename = "usuarioId", default)]
    pub user_id: Option<i64>,
    #[serde(rename = "eventoId", default)]
    pub event_id: Option<i64>,
    #[serde(rename = "quantidade")]
    pub quantity: i32,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "qrCodeUrl", default)]
    pub qr_code_url: Option<String>,
    pub status: TicketStatus,
    #[serde(rename = "valorTotal", default)]
    pub total: Option<f64>,
    #[serde(rename = "metodoPagamento", default)]
    pub payment_method: Option<String>,
    #[serde(rename = "cancelReason", default)]
    pub cancel_reason: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "canceledAt", default)]
    pub canceled_at: Option<String>,
    #[serde(rename = "evento", default)]
    pub event: Option<TicketEvent>,
    #[serde(rename = "usuario", default)]
    pub owner: Option<TicketOwner>,
}

impl Ticket {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TicketStatus::Active
    }
}

/// Default payment method accepted by the backend.
pub const DEFAULT_PAYMENT_METHOD: &str = "mock";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PurchaseRequest {
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "eventoId")]
    pub event_id: i64,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "paymentMethod", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

// =============================================================================
// FAQ & MESSAGES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    #[serde(rename = "pergunta")]
    pub question: String,
    #[serde(rename = "resposta")]
    pub answer: String,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "ordem", default)]
    pub order: Option<i32>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Open,
    Responded,
    Closed,
    #[serde(other)]
    Unknown,
}

/// Body for `POST /mensagens`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewMessage {
    #[serde(rename = "remetente", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "emailContato", skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    #[serde(rename = "remetente", default)]
    pub sender: Option<String>,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "emailContato", default)]
    pub contact_email: Option<String>,
    pub status: MessageStatus,
    #[serde(rename = "resposta", default)]
    pub reply: Option<String>,
    #[serde(rename = "adminRespondeu", default)]
    pub replied_by: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "respondidoAt", default)]
    pub replied_at: Option<String>,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Zero-based page index plus page size, sent as `page` / `size` query params.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

/// One page of a server-side paginated listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(rename = "totalElements")]
    pub total_elements: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    pub first: bool,
    pub last: bool,
}
