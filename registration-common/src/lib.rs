//! Registration Common Types
//!
//! Shared types used by the registration hook and its storage adapters.

pub mod event;
pub mod record;

pub use event::{AttributeError, UserAttributes};
pub use record::{RecordError, UserRecord};
