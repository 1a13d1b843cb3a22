//! `bridge` forwards the protocol engine lifecycle events to every connected admin
//! session. Only the transitions an admin has to act upon, or is waiting for, are
//! forwarded:
//!
//! - `offer_received` and `credential_received` for credential exchanges
//! - `request_received` for presentation exchanges, enriched with the holder
//!   credentials able to answer the proof request
use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::{json, Value};
use rst_common::with_logging::log::{debug, warn};

use prople_holder_core::holder::credential::types::State as CredentialState;
use prople_holder_core::holder::events::{
    Event, EventBus, EventHandler, Subscription, WebhookRecord,
};
use prople_holder_core::holder::pagination::DEFAULT_LIMIT;
use prople_holder_core::holder::presentation::types::{
    CredentialStoreBuilder, State as PresentationState,
};
use prople_holder_core::holder::{CredentialExchange, PresentationExchange};

use crate::config::Admin;
use crate::message::presentation::PresentationRequestReceived;
use crate::message::{AdminBody, AdminMessage};
use crate::session::AdminSessions;

pub struct EventBridge<TStore>
where
    TStore: CredentialStoreBuilder,
{
    sessions: AdminSessions,
    store: TStore,
    matching_limit: usize,
}

impl<TStore> EventBridge<TStore>
where
    TStore: CredentialStoreBuilder + 'static,
{
    pub fn new(sessions: AdminSessions, store: TStore, config: &Admin) -> Self {
        let matching_limit = usize::try_from(config.get_matching_credentials_limit())
            .unwrap_or(DEFAULT_LIMIT as usize);

        Self {
            sessions,
            store,
            matching_limit,
        }
    }

    /// `register` subscribes the bridge to both record topics. Dropping the returned
    /// subscriptions detaches the bridge
    pub fn register(self, bus: &EventBus) -> Vec<Subscription> {
        let bridge = Arc::new(self);

        vec![
            bus.subscribe_record::<CredentialExchange>(Arc::new(CredentialListener {
                bridge: bridge.clone(),
            })),
            bus.subscribe_record::<PresentationExchange>(Arc::new(PresentationListener {
                bridge,
            })),
        ]
    }

    /// `on_credential_event` returns the number of sessions notified
    pub async fn on_credential_event(&self, event: Event) -> usize {
        debug!("issue credential event: {}", event.topic);

        let record = match CredentialExchange::from_event(&event) {
            Ok(record) => record,
            Err(err) => {
                warn!("unable to decode credential exchange event: {}", err);
                return 0;
            }
        };

        let body = match record.get_state() {
            CredentialState::OfferReceived => AdminBody::CredentialOfferReceived(record),
            CredentialState::CredentialReceived => AdminBody::CredentialReceived(record),
            _ => return 0,
        };

        self.notify(AdminMessage::new(body)).await
    }

    /// `on_presentation_event` returns the number of sessions notified
    pub async fn on_presentation_event(&self, event: Event) -> usize {
        debug!("present proof event: {}", event.topic);

        let record = match PresentationExchange::from_event(&event) {
            Ok(record) => record,
            Err(err) => {
                warn!("unable to decode presentation exchange event: {}", err);
                return 0;
            }
        };

        if record.get_state() != PresentationState::RequestReceived {
            return 0;
        }

        let matching = self.matching_credentials(&record).await;
        let body = PresentationRequestReceived::new(record).with_matching_credentials(matching);

        self.notify(AdminMessage::new(AdminBody::PresentationRequestReceived(
            body,
        )))
        .await
    }

    /// a failed lookup still notifies admins, with an empty match set
    async fn matching_credentials(&self, record: &PresentationExchange) -> Vec<Value> {
        let proof_request = match record.get_presentation_request() {
            Some(request) => request,
            None => return Vec::new(),
        };

        self.store
            .get_matching_credentials(
                proof_request,
                Vec::new(),
                0,
                self.matching_limit,
                json!({}),
            )
            .await
            .unwrap_or_else(|err| {
                warn!(
                    "matching credentials lookup failed for presentation exchange {}: {}",
                    record.get_id(),
                    err
                );
                Vec::new()
            })
    }

    async fn notify(&self, message: AdminMessage) -> usize {
        debug!("prepared admin notification: {}", message.message_type());
        self.sessions.send_to_all_admins(message).await
    }
}

struct CredentialListener<TStore: CredentialStoreBuilder> {
    bridge: Arc<EventBridge<TStore>>,
}

#[async_trait]
impl<TStore> EventHandler for CredentialListener<TStore>
where
    TStore: CredentialStoreBuilder + 'static,
{
    async fn handle(&self, event: Event) {
        let _ = self.bridge.on_credential_event(event).await;
    }
}

struct PresentationListener<TStore: CredentialStoreBuilder> {
    bridge: Arc<EventBridge<TStore>>,
}

#[async_trait]
impl<TStore> EventHandler for PresentationListener<TStore>
where
    TStore: CredentialStoreBuilder + 'static,
{
    async fn handle(&self, event: Event) {
        let _ = self.bridge.on_presentation_event(event).await;
    }
}
