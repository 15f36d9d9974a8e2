//! Groceries Client
//!
//! A grocery list kept in sync with an Everlive backend. Layers, bottom up:
//!
//! - `models` / `store`: grocery entities and the ordered lists holding them
//! - `commands`: REST bindings behind the `Transport` seam
//! - `context`: the session credential shared by every authorized call
//! - `grocery_list` / `user`: the operations the front end invokes
//!
//! `config`, `credential_store` and `error` carry the ambient concerns.

pub mod commands;
pub mod config;
pub mod context;
pub mod credential_store;
pub mod error;
pub mod grocery_list;
pub mod models;
pub mod store;
pub mod user;

pub use commands::{HttpTransport, Transport};
pub use config::ClientConfig;
pub use context::{Route, Session, SessionState};
pub use credential_store::CredentialStore;
pub use error::{Action, ErrorKind, GroceryError, GroceryResult};
pub use grocery_list::GroceryList;
pub use models::GroceryItem;
pub use user::UserAccount;
