//! An unofficial client toolkit for the Notewell sync server: typed
//! access to the sharing API, plus the client side of its end-to-end
//! encryption (master keys, password checks, config-screen state).

#![forbid(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod e2ee;
pub mod endpoints;
mod id;
mod item;
mod session;
mod share;
mod sharing;
pub mod tasks;
mod user;

pub use id::Id;
pub use item::Item;
pub use session::Session;
pub use share::{Share, ShareType, ShareUser, UnknownShareType};
pub use sharing::{share_with_user_and_accept, ShareError, ShareOutcome};
pub use user::User;

/// The default user agent to use when communicating with the sync
/// server.
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));
