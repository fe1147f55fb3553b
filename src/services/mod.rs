//! External collaborators
//!
//! - User directory (data source for the users panel)

pub mod directory;

pub use directory::UserDirectory;
