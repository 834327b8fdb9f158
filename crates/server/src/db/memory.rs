//! In-process store.
//!
//! Used for local development (`STORE_BACKEND=memory`) and by the test suites.
//! Listing goes through the same filter evaluator as the domain layer, so its
//! results agree with the `PostgreSQL` store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use request_desk_core::listing;
use request_desk_core::{
    Email, ListFilter, NewOrder, NewTicket, Order, OrderId, OrderPatch, PageRequest, Settings,
    Slice, TicketId, TicketPatch, TiTicket, User, UserId,
};

use super::RepositoryError;
use super::store::{
    HealthCheck, NewUser, OnConflict, OrderStore, SettingsStore, TicketStore, UpsertOutcome,
    UserCredentials, UserStore,
};

/// Store holding everything in `RwLock`-guarded maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    orders: BTreeMap<OrderId, Order>,
    tickets: BTreeMap<TicketId, TiTicket>,
    users: HashMap<Email, UserCredentials>,
    settings: Option<Settings>,
    last_order_id: i32,
    last_ticket_id: i32,
    last_user_id: i32,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &mut i32) -> Result<i32, RepositoryError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| RepositoryError::Conflict("id sequence exhausted".to_owned()))?;
    Ok(*counter)
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, input: NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.inner.write().await;
        let id = OrderId::new(next_id(&mut tables.last_order_id)?);
        let order = Order::create(id, input, Utc::now());
        tables.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.inner.read().await.orders.get(&id).cloned())
    }

    async fn list_orders(
        &self,
        filter: &ListFilter,
        page: Option<PageRequest>,
    ) -> Result<Slice<Order>, RepositoryError> {
        let tables = self.inner.read().await;
        Ok(listing::select(tables.orders.values(), filter, page))
    }

    async fn update_order(
        &self,
        id: OrderId,
        patch: &OrderPatch,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.inner.write().await;
        let order = tables
            .orders
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        order.apply(patch, Utc::now());
        Ok(order.clone())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn create_ticket(&self, input: NewTicket) -> Result<TiTicket, RepositoryError> {
        let mut tables = self.inner.write().await;
        let id = TicketId::new(next_id(&mut tables.last_ticket_id)?);
        let ticket = TiTicket::create(id, input, Utc::now());
        tables.tickets.insert(id, ticket.clone());
        Ok(ticket)
    }

    async fn find_ticket(&self, id: TicketId) -> Result<Option<TiTicket>, RepositoryError> {
        Ok(self.inner.read().await.tickets.get(&id).cloned())
    }

    async fn list_tickets(
        &self,
        filter: &ListFilter,
        page: Option<PageRequest>,
    ) -> Result<Slice<TiTicket>, RepositoryError> {
        let tables = self.inner.read().await;
        Ok(listing::select(tables.tickets.values(), filter, page))
    }

    async fn update_ticket(
        &self,
        id: TicketId,
        patch: &TicketPatch,
    ) -> Result<TiTicket, RepositoryError> {
        let mut tables = self.inner.write().await;
        let ticket = tables
            .tickets
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        ticket.apply(patch, Utc::now());
        Ok(ticket.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn upsert_user(
        &self,
        user: &NewUser,
        on_conflict: OnConflict,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let mut tables = self.inner.write().await;

        if let Some(existing) = tables.users.get_mut(&user.email) {
            if on_conflict == OnConflict::Overwrite {
                existing.user.role = user.role;
                existing.password_hash.clone_from(&user.password_hash);
            }
            return Ok(UpsertOutcome {
                user: existing.user.clone(),
                created: false,
            });
        }

        let id = UserId::new(next_id(&mut tables.last_user_id)?);
        let credentials = UserCredentials {
            user: User {
                id,
                email: user.email.clone(),
                role: user.role,
            },
            password_hash: user.password_hash.clone(),
        };
        let created = credentials.user.clone();
        tables.users.insert(user.email.clone(), credentials);
        Ok(UpsertOutcome {
            user: created,
            created: true,
        })
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_settings(&self) -> Result<Option<Settings>, RepositoryError> {
        Ok(self.inner.read().await.settings.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<Settings, RepositoryError> {
        self.inner.write().await.settings = Some(settings.clone());
        Ok(settings.clone())
    }

    async fn init_settings(&self, settings: &Settings) -> Result<bool, RepositoryError> {
        let mut tables = self.inner.write().await;
        if tables.settings.is_some() {
            return Ok(false);
        }
        tables.settings = Some(settings.clone());
        Ok(true)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
