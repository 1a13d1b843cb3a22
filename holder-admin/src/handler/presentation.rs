use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::{debug, info};

use prople_holder_core::holder::connection::ConnectionStore;
use prople_holder_core::holder::credential::types::RepoBuilder as CredentialRepoBuilder;
use prople_holder_core::holder::gateway::{Gateway, RecordFilter};
use prople_holder_core::holder::outbound::Outbound;
use prople_holder_core::holder::pagination::Paginate;
use prople_holder_core::holder::presentation::types::{
    EngineBuilder, RepoBuilder as PresentationRepoBuilder, Role, State,
};
use prople_holder_core::holder::types::HolderError;
use prople_holder_core::holder::PresentationExchange;

use crate::config::Admin;
use crate::message::presentation::{
    PresentationRequestApprove, PresentationsGetList, PresentationsList, SendPresentationProposal,
};
use crate::message::types::MessageType;
use crate::message::{AdminBody, AdminMessage};

use super::context::RequestContext;
use super::locks::RecordLocks;
use super::{ready_connection, unsupported, MessageHandler};

#[derive(Clone)]
pub struct PresentationHandler<TRepo, TConnection, TEngine, TOutbound>
where
    TRepo: CredentialRepoBuilder + PresentationRepoBuilder,
    TConnection: ConnectionStore,
    TEngine: EngineBuilder,
    TOutbound: Outbound,
{
    gateway: Gateway<TRepo>,
    connections: TConnection,
    engine: TEngine,
    outbound: TOutbound,
    locks: RecordLocks,
    config: Admin,
}

impl<TRepo, TConnection, TEngine, TOutbound>
    PresentationHandler<TRepo, TConnection, TEngine, TOutbound>
where
    TRepo: CredentialRepoBuilder + PresentationRepoBuilder,
    TConnection: ConnectionStore,
    TEngine: EngineBuilder,
    TOutbound: Outbound,
{
    pub fn new(
        repo: TRepo,
        connections: TConnection,
        engine: TEngine,
        outbound: TOutbound,
        config: Admin,
    ) -> Self {
        Self {
            gateway: Gateway::new(repo),
            connections,
            engine,
            outbound,
            locks: RecordLocks::new(),
            config,
        }
    }

    async fn get_list(&self, msg: &PresentationsGetList) -> Result<AdminBody, HolderError> {
        let filter = RecordFilter::new()
            .with_post("role", Some(Value::from(Role::Prover.as_str())))
            .with_post("connection_id", msg.connection_id.to_owned().map(Value::from))
            .with_post("verified", msg.verified.map(Value::from));

        let records = self.gateway.query_presentations(&filter).await?;
        let paginate = msg
            .paginate
            .unwrap_or_else(|| Paginate::new(self.config.get_default_limit(), 0));

        let (results, page) = paginate.apply(records)?;
        Ok(AdminBody::PresentationsList(PresentationsList { results, page }))
    }

    async fn send_proposal(
        &self,
        msg: &SendPresentationProposal,
    ) -> Result<AdminBody, HolderError> {
        let connection = ready_connection(&self.connections, msg.connection_id.to_owned()).await?;

        let proposal = msg.to_proposal(self.config.get_auto_respond_presentation_request());
        let outbound_msg = proposal.to_message();

        let record = self.engine.create_exchange_for_proposal(proposal).await?;
        let outbound_msg = outbound_msg.with_thread(record.get_thread_id());
        debug!(
            "dispatching presentation proposal: {} on connection: {}",
            outbound_msg.id,
            connection.get_id()
        );

        self.outbound
            .send(outbound_msg, connection.get_id())
            .await?;

        info!(
            "presentation proposal sent, presentation exchange: {}",
            record.get_id()
        );
        Ok(AdminBody::PresentationExchange(record))
    }

    async fn request_received_record(
        &self,
        id: String,
    ) -> Result<PresentationExchange, HolderError> {
        let record = self
            .gateway
            .get_presentation(id.to_owned())
            .await
            .map_err(|err| match err {
                HolderError::RecordNotFound(_) => HolderError::InvalidPresentationExchange(
                    format!("presentation exchange not found: {}", id),
                ),
                other => other,
            })?;

        if record.get_state() != State::RequestReceived {
            return Err(HolderError::InvalidPresentationExchange(format!(
                "presentation exchange must be in {} state, current: {}",
                State::RequestReceived,
                record.get_state()
            )));
        }

        Ok(record)
    }

    async fn request_approve(
        &self,
        msg: &PresentationRequestApprove,
    ) -> Result<AdminBody, HolderError> {
        let _guard = self.locks.acquire(&msg.presentation_exchange_id).await;

        let record = self
            .request_received_record(msg.presentation_exchange_id.to_owned())
            .await?;

        let connection = ready_connection(&self.connections, record.get_connection_id()).await?;

        let requested_credentials = msg.requested_credentials();
        let unknown = requested_credentials.unknown_referents(&record);
        if !unknown.is_empty() {
            return Err(HolderError::InvalidPresentationExchange(format!(
                "referents not found in proof request: {}",
                unknown.join(", ")
            )));
        }

        let (record, presentation_msg) = self
            .engine
            .create_presentation(record, requested_credentials, msg.comment.to_owned())
            .await?;

        self.outbound
            .send(presentation_msg, connection.get_id())
            .await?;

        info!(
            "presentation sent, presentation exchange: {}",
            record.get_id()
        );
        Ok(AdminBody::PresentationSent(record))
    }
}

#[async_trait]
impl<TRepo, TConnection, TEngine, TOutbound> MessageHandler
    for PresentationHandler<TRepo, TConnection, TEngine, TOutbound>
where
    TRepo: CredentialRepoBuilder + PresentationRepoBuilder,
    TConnection: ConnectionStore,
    TEngine: EngineBuilder,
    TOutbound: Outbound,
{
    fn handles(&self, message_type: MessageType) -> bool {
        matches!(
            message_type,
            MessageType::PresentationsGetList
                | MessageType::SendPresentationProposal
                | MessageType::PresentationRequestApprove
        )
    }

    async fn call(
        &self,
        ctx: &RequestContext,
        message: &AdminMessage,
    ) -> Result<AdminBody, HolderError> {
        ctx.ensure_admin()?;

        match message.get_body() {
            AdminBody::PresentationsGetList(msg) => self.get_list(msg).await,
            AdminBody::SendPresentationProposal(msg) => self.send_proposal(msg).await,
            AdminBody::PresentationRequestApprove(msg) => self.request_approve(msg).await,
            _ => Err(unsupported(message)),
        }
    }
}
