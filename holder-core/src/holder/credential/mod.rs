mod exchange;
pub use exchange::{CredentialExchange, WEBHOOK_TOPIC};

pub mod types;
