use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use derive_more::{AsRef, From, Into};
use the_newtype::Newtype;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::uuid::Uuid;
use rst_common::with_logging::log::{debug, warn};
use rst_common::with_tokio::tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use rst_common::with_tokio::tokio::sync::RwLock;

use prople_holder_core::holder::types::HolderError;

use crate::message::AdminMessage;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Newtype, From, Into, AsRef)]
#[serde(crate = "self::serde")]
pub struct SessionID(String);

impl SessionID {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `ReplySink` is where the reply to an admin request is delivered
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(&self, message: AdminMessage) -> Result<(), HolderError>;
}

/// `AdminSession` is a connected admin client. Messages are delivered in FIFO order
/// through its own channel
#[derive(Clone, Debug)]
pub struct AdminSession {
    id: SessionID,
    sender: UnboundedSender<AdminMessage>,
}

impl AdminSession {
    pub fn channel() -> (Self, UnboundedReceiver<AdminMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let session = Self {
            id: SessionID::generate(),
            sender,
        };

        (session, receiver)
    }

    pub fn get_id(&self) -> SessionID {
        self.id.to_owned()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn deliver(&self, message: AdminMessage) -> Result<(), HolderError> {
        self.sender.send(message).map_err(|_| {
            HolderError::DispatchError(format!("admin session closed: {}", self.id))
        })
    }
}

#[async_trait]
impl ReplySink for AdminSession {
    async fn send_reply(&self, message: AdminMessage) -> Result<(), HolderError> {
        self.deliver(message)
    }
}

/// `AdminSessions` is the registry of connected admin clients, used to push
/// notifications that are not an answer to any request
#[derive(Clone, Default)]
pub struct AdminSessions {
    sessions: Arc<RwLock<HashMap<SessionID, AdminSession>>>,
}

impl AdminSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self) -> (AdminSession, UnboundedReceiver<AdminMessage>) {
        let (session, receiver) = AdminSession::channel();
        self.add(session.clone()).await;
        (session, receiver)
    }

    pub async fn add(&self, session: AdminSession) {
        debug!("admin session added: {}", session.get_id());
        self.sessions.write().await.insert(session.get_id(), session);
    }

    pub async fn close(&self, id: &SessionID) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// `send_to_all_admins` returns the number of sessions the message was delivered to
    ///
    /// A failing session never prevents the delivery to the others, and it is removed
    /// from the registry
    pub async fn send_to_all_admins(&self, message: AdminMessage) -> usize {
        let sessions: Vec<AdminSession> = self.sessions.read().await.values().cloned().collect();

        let mut delivered = 0;
        let mut dead = Vec::new();
        for session in sessions {
            match session.deliver(message.clone()) {
                Ok(_) => delivered += 1,
                Err(err) => {
                    warn!("dropping admin session: {}", err);
                    dead.push(session.get_id());
                }
            }
        }

        if !dead.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in dead.iter() {
                sessions.remove(id);
            }
        }

        delivered
    }
}
