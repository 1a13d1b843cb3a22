mod exchange;
pub use exchange::{PresentationExchange, WEBHOOK_TOPIC};

pub mod types;
