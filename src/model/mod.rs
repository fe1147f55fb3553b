//! Model layer - entity and collection state
//!
//! - `User` - the entity managed by the users panel
//! - `EntityStore` - collection state with validated transitions
//! - `ModalStack` - modal overlay management

pub mod collection;
pub mod modal;
pub mod user;

pub use collection::{CollectionState, EditOutcome, EntityStore};
pub use modal::{Modal, ModalStack};
pub use user::{Entity, User, UserId};
