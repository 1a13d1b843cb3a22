use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{Map, Value};
use rst_common::standard::uuid::Uuid;

use super::types::HolderError;

pub const ISSUE_CREDENTIAL_PROPOSAL: &str =
    "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/issue-credential/1.0/propose-credential";
pub const PRESENT_PROOF_PROPOSAL: &str =
    "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/present-proof/1.0/propose-presentation";

/// `Thread` is the `~thread` decorator shared by every `DIDComm` message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct Thread {
    pub thid: String,
}

/// `DIDCommMessage` is a protocol message addressed to the remote party
///
/// Its content is owned by the protocol engines, this layer only routes it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct DIDCommMessage {
    #[serde(rename = "@type")]
    pub message_type: String,

    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "~thread")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,

    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl DIDCommMessage {
    pub fn new(message_type: &str, body: Map<String, Value>) -> Self {
        Self {
            message_type: message_type.to_string(),
            id: Uuid::new_v4().to_string(),
            thread: None,
            body,
        }
    }

    pub fn with_thread(mut self, thid: String) -> Self {
        self.thread = Some(Thread { thid });
        self
    }

    /// `thread_id` falls back to the message id when the message opens a new thread
    pub fn thread_id(&self) -> String {
        self.thread
            .as_ref()
            .map(|thread| thread.thid.to_owned())
            .unwrap_or_else(|| self.id.to_owned())
    }
}

/// `Outbound` is the `DIDComm` transport used to reach the remote party
/// over an established connection
#[async_trait]
pub trait Outbound: Clone + Sync + Send {
    async fn send(&self, message: DIDCommMessage, connection_id: String)
        -> Result<(), HolderError>;
}
