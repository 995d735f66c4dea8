//! Domain layer for the chat room.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod policy;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{ChatMessage, DailyQuota, Identity, RETRACTED_PLACEHOLDER, Transcript};
pub use error::{ConnectionClosed, RepositoryError, RetractError, ValueObjectError};
pub use factory::{DEFAULT_AVATAR, DisplayNameFactory, MessageIdFactory, SessionIdFactory};
pub use policy::RoomPolicy;
pub use repository::RoomStateRepository;
pub use session::{Connection, Session};
pub use value_object::{IdentityId, MessageId, SessionId, Timestamp};
