//! `prople-holder-admin` exposes the admin message family used by an operator to drive
//! the holder side of credential issuance and presentation exchange.
//!
//! Inbound admin messages are decoded through the [`message::Registry`], dispatched to
//! the command handlers and answered on the request thread. Protocol events published
//! by the agent are forwarded to every open admin session through the
//! [`bridge::EventBridge`].
pub mod bridge;
pub mod common;
pub mod config;
pub mod handler;
pub mod message;
pub mod session;

mod service;
pub use service::Service;
