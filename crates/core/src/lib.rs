//! Request Desk core: domain types and request rules.
//!
//! Used by:
//! - `server` - HTTP API for material orders, TI tickets and settings
//! - `cli` - migrations, seeding and user management
//!
//! This crate performs no I/O. Everything a request has to satisfy before it
//! may reach a store lives here, so the rules are shared by every store
//! backend and testable without one.
//!
//! # Modules
//!
//! - [`types`] - ids, statuses, roles, emails and record types
//! - [`validation`] - create, login and settings payload checks
//! - [`patch`] - per-entity whitelisting of partial updates
//! - [`listing`] - filter and pagination model, in-memory evaluator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod patch;
pub mod types;
pub mod validation;

pub use listing::{ListFilter, ListQuery, ListQueryError, Listable, Page, PageRequest, Slice};
pub use patch::{PatchError, PatchPolicy, whitelist_order_patch, whitelist_ticket_patch};
pub use types::*;
pub use validation::{Credentials, FieldMap, ValidationError};
