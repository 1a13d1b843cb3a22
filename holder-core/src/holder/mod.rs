//! `holder` is the domain used by an administrative client to drive the holder side
//! of two `DIDComm` protocols:
//!
//! - `credential`, the issue credential protocol. The holder receives an offer,
//!   sends a request and finally receives the credential
//! - `presentation`, the present proof protocol. The holder receives a proof request,
//!   selects its matching credentials and sends the presentation
//!
//! ---
//!
//! The protocol state machines themselves live outside of this crate. This domain only
//! defines the shape of their exchange records and the contracts used to talk to them,
//! so the admin layer can validate a command against the current record state before
//! asking an engine to move forward.
//!
//! The `gateway` gives a read only view over both record collections, the `pagination`
//! applies positional windows over a query result, and the `events` module is a typed
//! publish/subscribe bus used by the engines to announce their lifecycle transitions.
pub mod types;

pub mod connection;
pub mod events;
pub mod gateway;
pub mod memory;
pub mod outbound;
pub mod pagination;

pub mod credential;
pub use credential::CredentialExchange;

pub mod presentation;
pub use presentation::PresentationExchange;
