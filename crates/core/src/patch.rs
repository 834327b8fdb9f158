//! Whitelisted partial updates.
//!
//! A patch body is first narrowed to the fields its entity allows to change;
//! anything else is dropped with a debug log, not rejected. What remains is
//! then type-checked field by field.

use serde_json::Value;

use crate::types::{OrderPatch, Status, TicketPatch};
use crate::validation::{FieldMap, optional_text, parse_quantity};

/// Why a patch was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// Nothing updatable was left after dropping non-whitelisted keys.
    #[error("no updatable fields supplied (allowed: {allowed})")]
    EmptyPatch {
        /// Comma-separated whitelist, for the client's benefit.
        allowed: String,
    },

    /// An enumerated field got a value outside its set.
    #[error("invalid {field}: {value} (expected one of {allowed})")]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: String,
    },

    /// A field got a value of the wrong type or out of range.
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Per-entity patch configuration.
#[derive(Debug, Clone, Copy)]
pub struct PatchPolicy {
    /// Entity name used in diagnostics.
    pub entity: &'static str,
    /// Keys a patch may touch.
    pub fields: &'static [&'static str],
    /// Values `status` may take.
    pub statuses: &'static [Status],
}

/// Orders may change status, response, notes and quantity.
pub const ORDER_PATCH_POLICY: PatchPolicy = PatchPolicy {
    entity: "order",
    fields: &["status", "response", "obs", "quantity"],
    statuses: &Status::ALL,
};

/// TI tickets may change status, response and description.
pub const TICKET_PATCH_POLICY: PatchPolicy = PatchPolicy {
    entity: "ti_ticket",
    fields: &["status", "response", "description"],
    statuses: &Status::ALL,
};

impl PatchPolicy {
    /// Keep only whitelisted keys. Fails when none remain.
    ///
    /// # Errors
    ///
    /// [`PatchError::EmptyPatch`] if no whitelisted key is present.
    pub fn select(&self, fields: &FieldMap) -> Result<FieldMap, PatchError> {
        let (kept, dropped): (Vec<(&String, &Value)>, Vec<_>) = fields
            .iter()
            .partition(|(key, _)| self.fields.contains(&key.as_str()));

        if !dropped.is_empty() {
            let dropped: Vec<&str> = dropped.iter().map(|(key, _)| key.as_str()).collect();
            tracing::debug!(entity = self.entity, ?dropped, "dropping non-whitelisted patch fields");
        }

        if kept.is_empty() {
            return Err(PatchError::EmptyPatch {
                allowed: self.fields.join(", "),
            });
        }

        Ok(kept
            .into_iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    /// Validate a `status` value against this entity's set.
    ///
    /// # Errors
    ///
    /// [`PatchError::InvalidEnum`] for anything that is not one of
    /// [`Self::statuses`] spelled exactly.
    pub fn status(&self, value: &Value) -> Result<Status, PatchError> {
        let parsed = value
            .as_str()
            .and_then(|s| s.parse::<Status>().ok())
            .filter(|status| self.statuses.contains(status));

        parsed.ok_or_else(|| PatchError::InvalidEnum {
            field: "status",
            value: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            allowed: self
                .statuses
                .iter()
                .map(Status::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Build an [`OrderPatch`] from a submitted body.
///
/// # Errors
///
/// See [`PatchError`].
pub fn whitelist_order_patch(fields: &FieldMap) -> Result<OrderPatch, PatchError> {
    let policy = ORDER_PATCH_POLICY;
    let selected = policy.select(fields)?;
    let mut patch = OrderPatch::default();

    if let Some(value) = selected.get("status") {
        patch.status = Some(policy.status(value)?);
    }
    if selected.contains_key("response") {
        patch.response = Some(nullable_text(&selected, "response")?);
    }
    if selected.contains_key("obs") {
        patch.obs = Some(nullable_text(&selected, "obs")?);
    }
    if let Some(value) = selected.get("quantity") {
        patch.quantity = Some(parse_quantity(value).ok_or(PatchError::InvalidValue {
            field: "quantity",
            reason: "must be a whole number of at least 1",
        })?);
    }

    debug_assert!(!patch.is_empty(), "a selected field must set the patch");
    Ok(patch)
}

/// Build a [`TicketPatch`] from a submitted body.
///
/// # Errors
///
/// See [`PatchError`].
pub fn whitelist_ticket_patch(fields: &FieldMap) -> Result<TicketPatch, PatchError> {
    let policy = TICKET_PATCH_POLICY;
    let selected = policy.select(fields)?;
    let mut patch = TicketPatch::default();

    if let Some(value) = selected.get("status") {
        patch.status = Some(policy.status(value)?);
    }
    if selected.contains_key("response") {
        patch.response = Some(nullable_text(&selected, "response")?);
    }
    if selected.contains_key("description") {
        patch.description = Some(nullable_text(&selected, "description")?);
    }

    debug_assert!(!patch.is_empty(), "a selected field must set the patch");
    Ok(patch)
}

/// Text that may be cleared: null or blank becomes `None`.
fn nullable_text(fields: &FieldMap, name: &'static str) -> Result<Option<String>, PatchError> {
    optional_text(fields, name).map_err(|_| PatchError::InvalidValue {
        field: name,
        reason: "must be a string or null",
    })
}
