use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};

use super::types::HolderError;

/// `State` is the `DIDComm` connection state as reported by the connection manager
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "lowercase")]
pub enum State {
    Init,
    Invitation,
    Request,
    Response,
    Active,
    Completed,
    Abandoned,
    Error,
}

/// `Connection` is the read only view of a pairwise connection owned by the
/// connection manager
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Connection {
    pub(crate) connection_id: String,
    pub(crate) state: State,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) my_did: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) their_did: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) their_label: Option<String>,
}

impl Connection {
    pub fn new(connection_id: String, state: State) -> Self {
        Self {
            connection_id,
            state,
            my_did: None,
            their_did: None,
            their_label: None,
        }
    }

    pub fn set_dids(&mut self, my_did: String, their_did: String) -> &mut Self {
        self.my_did = Some(my_did);
        self.their_did = Some(their_did);
        self
    }

    pub fn set_their_label(&mut self, label: String) -> &mut Self {
        self.their_label = Some(label);
        self
    }

    /// `is_ready` is true once the connection is able to carry protocol messages
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Response | State::Active | State::Completed)
    }

    pub fn get_id(&self) -> String {
        self.connection_id.to_owned()
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    pub fn get_my_did(&self) -> Option<String> {
        self.my_did.to_owned()
    }

    pub fn get_their_did(&self) -> Option<String> {
        self.their_did.to_owned()
    }
}

/// `ConnectionStore` is the connection manager abstraction
///
/// An unknown connection id MUST be reported as [`HolderError::ConnectionNotFound`]
#[async_trait]
pub trait ConnectionStore: Clone + Sync + Send {
    async fn retrieve(&self, connection_id: String) -> Result<Connection, HolderError>;
}
