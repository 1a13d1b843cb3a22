//! `handler` holds the admin command handlers. Every handler validates the command
//! preconditions against the current record state, asks the protocol engine to move
//! forward, dispatches the outbound message and returns the reply body.
use rst_common::standard::async_trait::async_trait;

use prople_holder_core::holder::connection::{Connection, ConnectionStore};
use prople_holder_core::holder::types::HolderError;

use crate::message::types::MessageType;
use crate::message::{AdminBody, AdminMessage};

pub mod context;
pub mod locks;

#[cfg(test)]
pub(crate) mod fakes;

mod credential;
pub use credential::CredentialHandler;

mod presentation;
pub use presentation::PresentationHandler;

use context::RequestContext;

#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn handles(&self, message_type: MessageType) -> bool;

    /// `call` MUST reject a non admin context with [`HolderError::AccessDenied`]
    async fn call(
        &self,
        ctx: &RequestContext,
        message: &AdminMessage,
    ) -> Result<AdminBody, HolderError>;
}

/// `ready_connection` resolves a connection able to carry protocol messages, any
/// failure is reported as [`HolderError::InvalidConnection`]
pub(crate) async fn ready_connection<TConnection: ConnectionStore>(
    connections: &TConnection,
    connection_id: String,
) -> Result<Connection, HolderError> {
    let connection = connections
        .retrieve(connection_id.to_owned())
        .await
        .map_err(|err| match err {
            HolderError::ConnectionNotFound(_) => HolderError::InvalidConnection(format!(
                "connection not found: {}",
                connection_id
            )),
            other => other,
        })?;

    if !connection.is_ready() {
        return Err(HolderError::InvalidConnection(format!(
            "connection not ready: {}",
            connection_id
        )));
    }

    Ok(connection)
}

fn unsupported(message: &AdminMessage) -> HolderError {
    HolderError::InvalidArgument(format!(
        "unsupported message: {}",
        message.message_type()
    ))
}
