use std::sync::Arc;

use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::{error, info, warn};

use prople_holder_core::holder::connection::ConnectionStore;
use prople_holder_core::holder::credential::types::{
    EngineBuilder as CredentialEngine, RepoBuilder as CredentialRepoBuilder,
};
use prople_holder_core::holder::events::{EventBus, Subscription};
use prople_holder_core::holder::outbound::Outbound;
use prople_holder_core::holder::presentation::types::{
    CredentialStoreBuilder, EngineBuilder as PresentationEngine,
    RepoBuilder as PresentationRepoBuilder,
};
use prople_holder_core::holder::types::HolderError;

use crate::bridge::EventBridge;
use crate::config::Config;
use crate::handler::context::RequestContext;
use crate::handler::{CredentialHandler, MessageHandler, PresentationHandler};
use crate::message::envelope::correlation;
use crate::message::problem_report::ProblemReport;
use crate::message::{AdminBody, AdminMessage, Registry};
use crate::session::{AdminSessions, ReplySink};

/// `Service` is the entry point of the admin layer
///
/// Every inbound admin message yields exactly one reply through the given
/// [`ReplySink`], either the command result or a problem report on the request
/// thread. Messages coming from a non admin channel are dropped without any reply.
#[derive(Clone)]
pub struct Service {
    config: Config,
    registry: Registry,
    handlers: Vec<Arc<dyn MessageHandler>>,
    sessions: AdminSessions,
}

impl Service {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: Registry::new(),
            handlers: Vec::new(),
            sessions: AdminSessions::new(),
        }
    }

    pub fn register_handler(&mut self, handler: Arc<dyn MessageHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// `build_handlers` registers the credential and presentation command handlers
    /// sharing the same collaborators
    pub fn build_handlers<TRepo, TConnection, TCredential, TPresentation, TOutbound>(
        &mut self,
        repo: TRepo,
        connections: TConnection,
        credential_engine: TCredential,
        presentation_engine: TPresentation,
        outbound: TOutbound,
    ) -> &mut Self
    where
        TRepo: CredentialRepoBuilder + PresentationRepoBuilder + 'static,
        TConnection: ConnectionStore + 'static,
        TCredential: CredentialEngine + 'static,
        TPresentation: PresentationEngine + 'static,
        TOutbound: Outbound + 'static,
    {
        let admin = self.config.admin().to_owned();

        let credential = CredentialHandler::new(
            repo.clone(),
            connections.clone(),
            credential_engine,
            outbound.clone(),
            admin.clone(),
        );

        let presentation =
            PresentationHandler::new(repo, connections, presentation_engine, outbound, admin);

        self.register_handler(Arc::new(credential))
            .register_handler(Arc::new(presentation))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn sessions(&self) -> AdminSessions {
        self.sessions.clone()
    }

    /// `event_bus` builds a bus sized from the `events` configuration
    pub fn event_bus(&self) -> EventBus {
        EventBus::with_capacity(self.config.events().get_channel_capacity())
    }

    pub fn start_bridge<TStore>(&self, bus: &EventBus, store: TStore) -> Vec<Subscription>
    where
        TStore: CredentialStoreBuilder + 'static,
    {
        EventBridge::new(self.sessions(), store, self.config.admin()).register(bus)
    }

    /// `process` handles a single raw admin message and returns the reply sent to `sink`
    pub async fn process<S: ReplySink>(
        &self,
        ctx: &RequestContext,
        raw: Value,
        sink: &S,
    ) -> Option<AdminMessage> {
        if let Err(err) = ctx.ensure_admin() {
            warn!(
                "admin message rejected from channel {:?}: {}",
                ctx.get_channel(),
                err
            );
            return None;
        }

        let thid = correlation(&raw);
        let reply = match self.registry.decode(raw) {
            Ok(message) => self.dispatch(ctx, &message).await?,
            Err(err) => {
                warn!("unable to decode admin message: {}", err);

                let report =
                    AdminMessage::new(AdminBody::ProblemReport(ProblemReport::from(&err)));
                match thid {
                    Some(thid) => report.with_thread(thid),
                    None => report,
                }
            }
        };

        if let Err(err) = sink.send_reply(reply.clone()).await {
            error!("unable to deliver admin reply {}: {}", reply.get_id(), err);
        }

        Some(reply)
    }

    async fn dispatch(&self, ctx: &RequestContext, message: &AdminMessage) -> Option<AdminMessage> {
        let message_type = message.message_type();
        let handler = self
            .handlers
            .iter()
            .find(|handler| handler.handles(message_type));

        let result = match handler {
            Some(handler) => handler.call(ctx, message).await,
            None => Err(HolderError::InvalidArgument(format!(
                "unsupported message: {}",
                message_type
            ))),
        };

        match result {
            Ok(body) => {
                info!("admin message handled: {}", message_type.name());
                Some(AdminMessage::reply(message, body))
            }
            Err(HolderError::AccessDenied) => {
                warn!("admin message rejected: {}", message_type.name());
                None
            }
            Err(err) => {
                match err {
                    HolderError::StoreError(_) => {
                        error!("{} failed: {}", message_type.name(), err)
                    }
                    _ => warn!("{} failed: {}", message_type.name(), err),
                }

                Some(AdminMessage::reply(
                    message,
                    AdminBody::ProblemReport(ProblemReport::from(&err)),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use rst_common::standard::async_trait::async_trait;
    use rst_common::standard::serde_json::{json, Map};
    use rst_common::standard::uuid::Uuid;
    use rst_common::with_tokio::tokio;
    use rst_common::with_tokio::tokio::sync::mpsc::UnboundedReceiver;
    use rst_common::with_tokio::tokio::sync::Mutex;

    use prople_holder_core::holder::connection::{Connection, State as ConnectionState};
    use prople_holder_core::holder::credential::types::{
        CredentialProposal, Role as CredentialRole, State as CredentialState,
    };
    use prople_holder_core::holder::gateway::TagFilter;
    use prople_holder_core::holder::memory::MemoryRepository;
    use prople_holder_core::holder::outbound::{DIDCommMessage, ISSUE_CREDENTIAL_PROPOSAL};
    use prople_holder_core::holder::presentation::types::{
        PresentationProposal, RequestedCredentials, Role as PresentationRole,
        State as PresentationState,
    };
    use prople_holder_core::holder::{CredentialExchange, PresentationExchange};

    use crate::config::Events;
    use crate::handler::fakes::{connection, presentation_record};
    use crate::message::problem_report::WhoRetries;
    use crate::message::types::MessageType;
    use crate::session::AdminSession;

    const CREDENTIAL_REQUEST: &str =
        "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/issue-credential/1.0/request-credential";
    const PRESENTATION: &str =
        "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/present-proof/1.0/presentation";

    #[derive(Clone)]
    struct Connections {
        connections: Vec<Connection>,
    }

    #[async_trait]
    impl ConnectionStore for Connections {
        async fn retrieve(&self, connection_id: String) -> Result<Connection, HolderError> {
            self.connections
                .iter()
                .find(|connection| connection.get_id() == connection_id)
                .cloned()
                .ok_or(HolderError::ConnectionNotFound(connection_id))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingOutbound {
        sent: Arc<Mutex<Vec<(DIDCommMessage, String)>>>,
    }

    impl RecordingOutbound {
        async fn sent(&self) -> Vec<(DIDCommMessage, String)> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Outbound for RecordingOutbound {
        async fn send(
            &self,
            message: DIDCommMessage,
            connection_id: String,
        ) -> Result<(), HolderError> {
            self.sent.lock().await.push((message, connection_id));
            Ok(())
        }
    }

    /// protocol engines persisting into the in memory store and publishing every
    /// transition on the bus
    #[derive(Clone)]
    struct Engines {
        repo: MemoryRepository,
        bus: EventBus,
    }

    impl Engines {
        async fn receive_offer(&self, connection_id: &str) -> CredentialExchange {
            let mut record = CredentialExchange::new(
                connection_id.to_string(),
                Uuid::new_v4().to_string(),
                CredentialRole::Holder,
                CredentialState::OfferReceived,
            );
            record.set_credential_offer(json!({"cred_def_id": "cred-def"}));

            self.repo
                .save_credential_exchange(record.clone())
                .await
                .unwrap();
            self.bus.publish_record(&record).unwrap();
            record
        }

        async fn receive_request(&self, connection_id: &str) -> PresentationExchange {
            let record = presentation_record(connection_id, PresentationState::RequestReceived);

            self.repo
                .save_presentation_exchange(record.clone())
                .await
                .unwrap();
            self.bus.publish_record(&record).unwrap();
            record
        }
    }

    #[async_trait]
    impl CredentialEngine for Engines {
        async fn create_proposal(
            &self,
            proposal: CredentialProposal,
        ) -> Result<CredentialExchange, HolderError> {
            let mut record = CredentialExchange::new(
                proposal.connection_id.to_owned(),
                Uuid::new_v4().to_string(),
                CredentialRole::Holder,
                CredentialState::ProposalSent,
            );

            if let Some(cred_def_id) = proposal.cred_def_id {
                record.set_credential_definition_id(cred_def_id);
            }

            self.repo.save_credential_exchange(record.clone()).await?;
            self.bus.publish_record(&record)?;
            Ok(record)
        }

        async fn create_request(
            &self,
            mut record: CredentialExchange,
            holder_did: String,
        ) -> Result<(CredentialExchange, DIDCommMessage), HolderError> {
            record
                .advance(CredentialState::RequestSent)?
                .set_credential_request(json!({"prover_did": holder_did}));

            self.repo.save_credential_exchange(record.clone()).await?;
            self.bus.publish_record(&record)?;

            let message = DIDCommMessage::new(CREDENTIAL_REQUEST, Map::new())
                .with_thread(record.get_thread_id());
            Ok((record, message))
        }
    }

    #[async_trait]
    impl PresentationEngine for Engines {
        async fn create_exchange_for_proposal(
            &self,
            proposal: PresentationProposal,
        ) -> Result<PresentationExchange, HolderError> {
            let mut record = PresentationExchange::new(
                proposal.connection_id.to_owned(),
                Uuid::new_v4().to_string(),
                PresentationRole::Prover,
                PresentationState::ProposalSent,
            );
            record
                .set_presentation_proposal(proposal.presentation_proposal)
                .set_auto_present(proposal.auto_present);

            self.repo.save_presentation_exchange(record.clone()).await?;
            Ok(record)
        }

        async fn create_presentation(
            &self,
            mut record: PresentationExchange,
            _requested_credentials: RequestedCredentials,
            _comment: Option<String>,
        ) -> Result<(PresentationExchange, DIDCommMessage), HolderError> {
            tokio::task::yield_now().await;

            record
                .set_state(PresentationState::PresentationSent)
                .set_presentation(json!({"proof": {}}));

            self.repo.save_presentation_exchange(record.clone()).await?;
            self.bus.publish_record(&record)?;

            let message = DIDCommMessage::new(PRESENTATION, Map::new())
                .with_thread(record.get_thread_id());
            Ok((record, message))
        }
    }

    #[derive(Clone)]
    struct Wallet;

    #[async_trait]
    impl CredentialStoreBuilder for Wallet {
        async fn get_matching_credentials(
            &self,
            _proof_request: Value,
            _referents: Vec<String>,
            _offset: usize,
            _limit: usize,
            _extra_query: Value,
        ) -> Result<Vec<Value>, HolderError> {
            Ok(vec![json!({"cred_info": {"referent": "cred-1"}})])
        }
    }

    #[derive(Clone)]
    struct SlowWallet;

    #[async_trait]
    impl CredentialStoreBuilder for SlowWallet {
        async fn get_matching_credentials(
            &self,
            _proof_request: Value,
            _referents: Vec<String>,
            _offset: usize,
            _limit: usize,
            _extra_query: Value,
        ) -> Result<Vec<Value>, HolderError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(Vec::new())
        }
    }

    #[derive(Clone)]
    struct UnreachableRepo;

    #[async_trait]
    impl CredentialRepoBuilder for UnreachableRepo {
        async fn query_credential_exchanges(
            &self,
            _tags: TagFilter,
        ) -> Result<Vec<CredentialExchange>, HolderError> {
            Err(HolderError::StoreError("record store unreachable".to_string()))
        }

        async fn get_credential_exchange(
            &self,
            _id: String,
        ) -> Result<CredentialExchange, HolderError> {
            Err(HolderError::StoreError("record store unreachable".to_string()))
        }

        async fn save_credential_exchange(
            &self,
            _record: CredentialExchange,
        ) -> Result<(), HolderError> {
            Err(HolderError::StoreError("record store unreachable".to_string()))
        }
    }

    #[async_trait]
    impl PresentationRepoBuilder for UnreachableRepo {
        async fn query_presentation_exchanges(
            &self,
            _tags: TagFilter,
        ) -> Result<Vec<PresentationExchange>, HolderError> {
            Err(HolderError::StoreError("record store unreachable".to_string()))
        }

        async fn get_presentation_exchange(
            &self,
            _id: String,
        ) -> Result<PresentationExchange, HolderError> {
            Err(HolderError::StoreError("record store unreachable".to_string()))
        }

        async fn save_presentation_exchange(
            &self,
            _record: PresentationExchange,
        ) -> Result<(), HolderError> {
            Err(HolderError::StoreError("record store unreachable".to_string()))
        }
    }

    struct Fixture {
        service: Service,
        engines: Engines,
        outbound: RecordingOutbound,
        bus: EventBus,
    }

    fn setup() -> Fixture {
        let repo = MemoryRepository::new();
        let mut service = Service::new(Config::default());
        let bus = service.event_bus();

        let engines = Engines {
            repo: repo.clone(),
            bus: bus.clone(),
        };
        let outbound = RecordingOutbound::default();
        let connections = Connections {
            connections: vec![
                connection("conn-1", ConnectionState::Active),
                connection("conn-2", ConnectionState::Invitation),
            ],
        };

        service.build_handlers(
            repo,
            connections,
            engines.clone(),
            engines.clone(),
            outbound.clone(),
        );

        Fixture {
            service,
            engines,
            outbound,
            bus,
        }
    }

    fn problem_report(reply: &AdminMessage) -> ProblemReport {
        match reply.get_body() {
            AdminBody::ProblemReport(report) => report.clone(),
            other => panic!("expected problem report, got: {:?}", other),
        }
    }

    fn approve_request(id: &str, record: &PresentationExchange, attribute: &str) -> Value {
        json!({
            "@type": MessageType::PresentationRequestApprove.uri(),
            "@id": id,
            "presentation_exchange_id": record.get_id(),
            "self_attested_attributes": {},
            "requested_attributes": {
                attribute: {"cred_id": "cred-1", "revealed": true}
            },
            "requested_predicates": {
                "pred_age": {"cred_id": "cred-1"}
            }
        })
    }

    async fn admin_session(
        service: &Service,
    ) -> (AdminSession, UnboundedReceiver<AdminMessage>) {
        service.sessions().open().await
    }

    #[tokio::test]
    async fn test_send_credential_proposal_on_ready_connection() {
        let fixture = setup();
        let (session, mut replies) = admin_session(&fixture.service).await;

        let raw = json!({
            "@type": MessageType::SendCredentialProposal.uri(),
            "@id": "req-a",
            "connection_id": "conn-1",
            "cred_def_id": "cred-def",
            "credential_proposal": {
                "attributes": [{"name": "name", "value": "alice"}]
            }
        });

        let reply = fixture
            .service
            .process(&RequestContext::admin(), raw, &session)
            .await
            .unwrap();

        assert_eq!(reply.message_type(), MessageType::CredentialExchange);
        assert_eq!(reply.thread_id(), "req-a");

        let value = reply.to_value().unwrap();
        assert_eq!(value["state"], "proposal_sent");
        assert_eq!(value["connection_id"], "conn-1");
        assert_eq!(value["~thread"]["thid"], "req-a");

        assert_eq!(replies.recv().await.unwrap(), reply);

        let sent = fixture.outbound.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.message_type, ISSUE_CREDENTIAL_PROPOSAL);
        assert_eq!(sent[0].1, "conn-1");
    }

    #[tokio::test]
    async fn test_send_credential_proposal_connection_problems() {
        let table = vec![
            ("conn-unknown", "connection not found"),
            ("conn-2", "connection not ready"),
        ];

        let fixture = setup();
        let (session, _replies) = admin_session(&fixture.service).await;

        for (connection_id, expected) in table {
            let raw = json!({
                "@type": MessageType::SendCredentialProposal.uri(),
                "@id": "req-a",
                "connection_id": connection_id
            });

            let reply = fixture
                .service
                .process(&RequestContext::admin(), raw, &session)
                .await
                .unwrap();

            let report = problem_report(&reply);
            assert!(report.explain_ltxt.contains(expected));
            assert_eq!(report.who_retries, WhoRetries::None);
            assert_eq!(reply.thread_id(), "req-a");
        }

        assert!(fixture.outbound.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_offer_received_notifies_every_admin() {
        let fixture = setup();
        let (_first, mut first_rx) = admin_session(&fixture.service).await;
        let (_second, mut second_rx) = admin_session(&fixture.service).await;

        let _subscriptions = fixture.service.start_bridge(&fixture.bus, Wallet);
        let record = fixture.engines.receive_offer("conn-1").await;

        for rx in [&mut first_rx, &mut second_rx] {
            let message = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap()
                .unwrap();

            match message.get_body() {
                AdminBody::CredentialOfferReceived(received) => {
                    assert_eq!(received.get_id(), record.get_id());
                    assert_eq!(received.get_state(), CredentialState::OfferReceived);
                }
                other => panic!("unexpected notification: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_request_received_notification_carries_matches() {
        let fixture = setup();
        let (_session, mut rx) = admin_session(&fixture.service).await;

        let _subscriptions = fixture.service.start_bridge(&fixture.bus, Wallet);
        let record = fixture.engines.receive_request("conn-1").await;

        let message = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();

        let value = message.to_value().unwrap();
        assert_eq!(
            value["@type"],
            MessageType::PresentationRequestReceived.uri()
        );
        assert_eq!(value["record"]["presentation_exchange_id"], record.get_id());
        assert_eq!(value["matching_credentials"][0]["cred_info"]["referent"], "cred-1");
        assert_eq!(value["page"]["count"], 1);
    }

    #[tokio::test]
    async fn test_offer_accept_sends_request() {
        let fixture = setup();
        let (session, _replies) = admin_session(&fixture.service).await;
        let record = fixture.engines.receive_offer("conn-1").await;

        let raw = json!({
            "@type": MessageType::CredentialOfferAccept.uri(),
            "@id": "req-c",
            "credential_exchange_id": record.get_id()
        });

        let reply = fixture
            .service
            .process(&RequestContext::admin(), raw.clone(), &session)
            .await
            .unwrap();

        assert_eq!(reply.message_type(), MessageType::CredentialRequestSent);
        assert_eq!(reply.thread_id(), "req-c");

        let stored = fixture
            .engines
            .repo
            .get_credential_exchange(record.get_id())
            .await
            .unwrap();
        assert_eq!(stored.get_state(), CredentialState::RequestSent);

        let sent = fixture.outbound.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.message_type, CREDENTIAL_REQUEST);
        assert_eq!(sent[0].1, "conn-1");

        let again = fixture
            .service
            .process(&RequestContext::admin(), raw, &session)
            .await
            .unwrap();
        assert!(problem_report(&again)
            .explain_ltxt
            .contains("invalid credential exchange"));
        assert_eq!(fixture.outbound.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_approve_with_unknown_referent() {
        let fixture = setup();
        let (session, _replies) = admin_session(&fixture.service).await;
        let record = fixture.engines.receive_request("conn-1").await;

        let reply = fixture
            .service
            .process(
                &RequestContext::admin(),
                approve_request("req-d", &record, "attr_unknown"),
                &session,
            )
            .await
            .unwrap();

        let report = problem_report(&reply);
        assert!(report.explain_ltxt.contains("attr_unknown"));
        assert_eq!(report.who_retries, WhoRetries::None);
        assert_eq!(reply.thread_id(), "req-d");
        assert!(fixture.outbound.sent().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_approve_single_winner() {
        let fixture = setup();
        let service = Arc::new(fixture.service.clone());
        let (session, _replies) = admin_session(&service).await;
        let record = fixture.engines.receive_request("conn-1").await;

        let tasks: Vec<_> = (0..2)
            .map(|n| {
                let service = service.clone();
                let session = session.clone();
                let raw = approve_request(&format!("req-{}", n), &record, "attr_name");

                tokio::spawn(async move {
                    service
                        .process(&RequestContext::admin(), raw, &session)
                        .await
                })
            })
            .collect();

        let mut sent = 0;
        let mut rejected = 0;
        for task in tasks {
            let reply = task.await.unwrap().unwrap();
            match reply.get_body() {
                AdminBody::PresentationSent(record) => {
                    assert_eq!(record.get_state(), PresentationState::PresentationSent);
                    sent += 1;
                }
                AdminBody::ProblemReport(report) => {
                    assert!(report.explain_ltxt.contains("presentation_sent"));
                    rejected += 1;
                }
                other => panic!("unexpected reply: {:?}", other),
            }
        }

        assert_eq!(sent, 1);
        assert_eq!(rejected, 1);
        assert_eq!(fixture.outbound.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_peer_channel_gets_no_reply() {
        let fixture = setup();
        let (session, mut replies) = admin_session(&fixture.service).await;

        let raw = json!({
            "@type": MessageType::SendCredentialProposal.uri(),
            "@id": "req-peer",
            "connection_id": "conn-1"
        });

        let reply = fixture
            .service
            .process(&RequestContext::peer("conn-1".to_string()), raw, &session)
            .await;

        assert!(reply.is_none());
        assert!(replies.try_recv().is_err());
        assert!(fixture.outbound.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_messages_get_problem_report() {
        let fixture = setup();
        let (session, _replies) = admin_session(&fixture.service).await;

        let table = vec![
            (
                json!({
                    "@type": "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/admin-holder/0.1/unknown",
                    "@id": "req-1"
                }),
                "req-1",
            ),
            (
                json!({
                    "@type": MessageType::CredentialOfferAccept.uri(),
                    "@id": "req-2",
                    "~thread": {"thid": "thread-2"}
                }),
                "thread-2",
            ),
            (
                json!({
                    "@type": MessageType::CredentialsList.uri(),
                    "@id": "req-3",
                    "results": [],
                    "~page": {"count": 0, "offset": 0}
                }),
                "req-3",
            ),
        ];

        for (raw, thid) in table {
            let reply = fixture
                .service
                .process(&RequestContext::admin(), raw, &session)
                .await
                .unwrap();

            assert_eq!(reply.message_type(), MessageType::ProblemReport);
            assert_eq!(reply.thread_id(), thid);
        }
    }

    #[tokio::test]
    async fn test_credentials_get_list_with_states() {
        let fixture = setup();
        let (session, _replies) = admin_session(&fixture.service).await;

        let first = fixture.engines.receive_offer("conn-1").await;
        let accepted = fixture.engines.receive_offer("conn-1").await;
        let second = fixture.engines.receive_offer("conn-1").await;

        let accept = json!({
            "@type": MessageType::CredentialOfferAccept.uri(),
            "@id": "req-accept",
            "credential_exchange_id": accepted.get_id()
        });
        fixture
            .service
            .process(&RequestContext::admin(), accept, &session)
            .await
            .unwrap();

        let raw = json!({
            "@type": MessageType::CredentialsGetList.uri(),
            "@id": "req-list",
            "states": ["offer_received"],
            "~paginate": {"limit": 5, "offset": 0}
        });

        let reply = fixture
            .service
            .process(&RequestContext::admin(), raw, &session)
            .await
            .unwrap();

        let value = reply.to_value().unwrap();
        assert_eq!(value["@type"], MessageType::CredentialsList.uri());
        assert_eq!(value["~page"]["count"], 2);
        assert_eq!(value["~page"]["offset"], 0);
        assert_eq!(value["results"][0]["credential_exchange_id"], first.get_id());
        assert_eq!(value["results"][1]["credential_exchange_id"], second.get_id());
    }

    #[tokio::test]
    async fn test_request_received_burst_reaches_admin() {
        let service = Service::new(Config::new().with_events(Events::new(2)));
        let bus = service.event_bus();
        let (_session, mut rx) = admin_session(&service).await;
        let _subscriptions = service.start_bridge(&bus, SlowWallet);

        let records: Vec<PresentationExchange> = (0..12)
            .map(|_| presentation_record("conn-1", PresentationState::RequestReceived))
            .collect();

        for record in records.iter() {
            assert_eq!(bus.publish_record(record).unwrap(), 1);
        }

        for record in records.iter() {
            let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();

            match message.get_body() {
                AdminBody::PresentationRequestReceived(received) => {
                    assert_eq!(received.record.get_id(), record.get_id());
                }
                other => panic!("unexpected notification: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_store_failure_reported_to_holder() {
        let repo = MemoryRepository::new();
        let mut service = Service::new(Config::default());
        let engines = Engines {
            repo,
            bus: service.event_bus(),
        };
        let connections = Connections {
            connections: vec![connection("conn-1", ConnectionState::Active)],
        };

        service.build_handlers(
            UnreachableRepo,
            connections,
            engines.clone(),
            engines,
            RecordingOutbound::default(),
        );

        let (session, mut replies) = admin_session(&service).await;
        let table = vec![
            json!({
                "@type": MessageType::CredentialsGetList.uri(),
                "@id": "req-store-1"
            }),
            json!({
                "@type": MessageType::PresentationsGetList.uri(),
                "@id": "req-store-2",
                "~thread": {"thid": "thread-store"}
            }),
        ];
        let expected_threads = vec!["req-store-1", "thread-store"];

        for (raw, thid) in table.into_iter().zip(expected_threads) {
            let reply = service
                .process(&RequestContext::admin(), raw, &session)
                .await
                .unwrap();

            assert_eq!(reply.thread_id(), thid);
            let report = problem_report(&reply);
            assert_eq!(report.who_retries, WhoRetries::Holder);
            assert!(report.explain_ltxt.contains("record store unreachable"));

            let value = replies.recv().await.unwrap().to_value().unwrap();
            assert_eq!(value["who_retries"], "holder");
            assert_eq!(value["~thread"]["thid"], thid);
        }
    }
}
