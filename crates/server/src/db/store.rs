//! Store traits.
//!
//! Each call is atomic and independent; there are no multi-record
//! transactions. Concurrent updates to the same record are last-write-wins.

use async_trait::async_trait;

use request_desk_core::{
    Email, ListFilter, NewOrder, NewTicket, Order, OrderId, OrderPatch, PageRequest, Role,
    Settings, Slice, TicketId, TicketPatch, TiTicket, User,
};

use super::RepositoryError;

/// A user about to be written by seeding or the CLI.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub role: Role,
}

/// A user together with the stored hash, for the login check only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// What to do when a user with the same email already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Leave the existing account untouched.
    Keep,
    /// Replace its role and password hash.
    Overwrite,
}

/// Result of [`UserStore::upsert_user`].
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub user: User,
    pub created: bool,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order in status `aberto`.
    async fn create_order(&self, input: NewOrder) -> Result<Order, RepositoryError>;

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Matching orders, newest first. `page` of `None` returns every match.
    async fn list_orders(
        &self,
        filter: &ListFilter,
        page: Option<PageRequest>,
    ) -> Result<Slice<Order>, RepositoryError>;

    /// Apply a whitelisted patch.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] if no order has this id.
    async fn update_order(&self, id: OrderId, patch: &OrderPatch)
    -> Result<Order, RepositoryError>;
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn create_ticket(&self, input: NewTicket) -> Result<TiTicket, RepositoryError>;

    async fn find_ticket(&self, id: TicketId) -> Result<Option<TiTicket>, RepositoryError>;

    async fn list_tickets(
        &self,
        filter: &ListFilter,
        page: Option<PageRequest>,
    ) -> Result<Slice<TiTicket>, RepositoryError>;

    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] if no ticket has this id.
    async fn update_ticket(
        &self,
        id: TicketId,
        patch: &TicketPatch,
    ) -> Result<TiTicket, RepositoryError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError>;

    async fn upsert_user(
        &self,
        user: &NewUser,
        on_conflict: OnConflict,
    ) -> Result<UpsertOutcome, RepositoryError>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The stored row, if it was ever written.
    async fn load_settings(&self) -> Result<Option<Settings>, RepositoryError>;

    /// Create or fully overwrite the row.
    async fn save_settings(&self, settings: &Settings) -> Result<Settings, RepositoryError>;

    /// Create the row only if it is absent. Returns whether it was created.
    async fn init_settings(&self, settings: &Settings) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Everything the API needs from persistence.
pub trait Store: OrderStore + TicketStore + UserStore + SettingsStore + HealthCheck {}

impl<T> Store for T where T: OrderStore + TicketStore + UserStore + SettingsStore + HealthCheck {}
