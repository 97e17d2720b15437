//! GoodGeeks site backend — contact intake, newsletter, reviews, chat proxy.

pub mod chat;
pub mod config;
pub mod error;
pub mod intake;
pub mod notify;
pub mod routes;
pub mod store;
