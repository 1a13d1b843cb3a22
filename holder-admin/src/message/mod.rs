//! `message` is the admin holder message family: type constants, data contracts,
//! the wire envelope and the registry used to decode inbound messages.
pub mod types;

pub mod credential;
pub mod envelope;
pub mod presentation;
pub mod problem_report;
pub mod registry;

pub use envelope::{AdminBody, AdminMessage};
pub use registry::Registry;
