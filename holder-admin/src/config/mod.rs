mod admin;
pub use admin::Admin;

mod events;
pub use events::Events;

mod config;
pub use config::Config;

mod parser;
pub use parser::Parser;
