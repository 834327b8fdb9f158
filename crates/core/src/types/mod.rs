//! Domain types shared by every Request Desk component.

pub mod email;
pub mod id;
pub mod record;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use record::*;
pub use status::*;
