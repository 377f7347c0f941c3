//! Query engines and guarded mutation commands over the Fyyur store.
//!
//! Every function takes its store handle explicitly. Reads accept any
//! [`sea_orm::ConnectionTrait`]; mutations take the pooled connection and run
//! through [`guard::MutationGuard`].

pub mod booking;
pub mod drinks;
pub mod error;
pub mod genres;
pub mod geo;
pub mod guard;
pub mod page;
pub mod quiz;
pub mod search;
pub mod store;
pub mod temporal;
pub mod trivia;

pub use error::CoreError;
pub use guard::{Affected, MutationState, Outcome};
pub use page::Page;
