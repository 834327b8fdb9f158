//! Persisted records and the normalized inputs that create or change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{OrderId, TicketId, UserId};
use super::status::{Role, Status};

/// A user account. Read-only to the API; the password hash never leaves the
/// store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Store-assigned id.
    pub id: UserId,
    /// Unique login key.
    pub email: Email,
    /// What the account may do.
    pub role: Role,
}

/// A material order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned, monotonic.
    pub id: OrderId,
    /// What is being requested.
    pub item: String,
    /// How many, always at least one.
    pub quantity: i32,
    /// Free-form notes from the requester.
    pub obs: Option<String>,
    /// Requesting sector.
    pub sector: String,
    /// Requester name or store.
    pub name_or_store: String,
    /// Lifecycle status.
    pub status: Status,
    /// Reply from whoever handles the order.
    pub response: Option<String>,
    /// Set once on creation.
    pub created_at: DateTime<Utc>,
    /// Bumped on every update.
    pub updated_at: DateTime<Utc>,
}

/// An IT support ticket. Same lifecycle as [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiTicket {
    /// Store-assigned, monotonic.
    pub id: TicketId,
    /// Short summary.
    pub title: String,
    /// Longer explanation of the problem.
    pub description: Option<String>,
    /// Requesting sector.
    pub sector: String,
    /// Requester name or store.
    pub name_or_store: String,
    /// Lifecycle status.
    pub status: Status,
    /// Reply from the IT team.
    pub response: Option<String>,
    /// Set once on creation.
    pub created_at: DateTime<Utc>,
    /// Bumped on every update.
    pub updated_at: DateTime<Utc>,
}

/// The single settings row: the sector/store context currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Selected sector, `""` when unset.
    pub sector: String,
    /// Selected requester or store, `""` when unset.
    pub name_or_store: String,
}

/// Validated input for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub item: String,
    pub quantity: i32,
    pub obs: Option<String>,
    pub sector: String,
    pub name_or_store: String,
}

/// Validated input for creating a TI ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: Option<String>,
    pub sector: String,
    pub name_or_store: String,
}

/// Whitelisted partial update for an order.
///
/// `None` leaves a field untouched. For nullable text, `Some(None)` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub status: Option<Status>,
    pub response: Option<Option<String>>,
    pub obs: Option<Option<String>>,
    pub quantity: Option<i32>,
}

/// Whitelisted partial update for a TI ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPatch {
    pub status: Option<Status>,
    pub response: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl OrderPatch {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.response.is_none()
            && self.obs.is_none()
            && self.quantity.is_none()
    }
}

impl TicketPatch {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.response.is_none() && self.description.is_none()
    }
}

impl Order {
    /// Build a freshly created order in status `aberto`.
    #[must_use]
    pub fn create(id: OrderId, input: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            item: input.item,
            quantity: input.quantity,
            obs: input.obs,
            sector: input.sector,
            name_or_store: input.name_or_store,
            status: Status::Aberto,
            response: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a whitelisted patch in place.
    pub fn apply(&mut self, patch: &OrderPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(response) = &patch.response {
            self.response.clone_from(response);
        }
        if let Some(obs) = &patch.obs {
            self.obs.clone_from(obs);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        self.updated_at = now;
    }
}

impl TiTicket {
    /// Build a freshly created ticket in status `aberto`.
    #[must_use]
    pub fn create(id: TicketId, input: NewTicket, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            sector: input.sector,
            name_or_store: input.name_or_store,
            status: Status::Aberto,
            response: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a whitelisted patch in place.
    pub fn apply(&mut self, patch: &TicketPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(response) = &patch.response {
            self.response.clone_from(response);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        self.updated_at = now;
    }
}
