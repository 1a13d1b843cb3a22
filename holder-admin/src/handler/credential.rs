use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::{debug, info};

use prople_holder_core::holder::connection::ConnectionStore;
use prople_holder_core::holder::credential::types::{
    CredentialProposal, EngineBuilder, RepoBuilder as CredentialRepoBuilder, State,
};
use prople_holder_core::holder::gateway::{Gateway, RecordFilter};
use prople_holder_core::holder::outbound::Outbound;
use prople_holder_core::holder::pagination::Paginate;
use prople_holder_core::holder::presentation::types::RepoBuilder as PresentationRepoBuilder;
use prople_holder_core::holder::types::HolderError;

use crate::config::Admin;
use crate::message::credential::{
    CredentialOfferAccept, CredentialsGetList, CredentialsList, SendCredentialProposal,
};
use crate::message::types::MessageType;
use crate::message::{AdminBody, AdminMessage};

use super::context::RequestContext;
use super::locks::RecordLocks;
use super::{ready_connection, unsupported, MessageHandler};

#[derive(Clone)]
pub struct CredentialHandler<TRepo, TConnection, TEngine, TOutbound>
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
    CredentialHandler<TRepo, TConnection, TEngine, TOutbound>
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

    async fn get_list(&self, msg: &CredentialsGetList) -> Result<AdminBody, HolderError> {
        let mut records = self.gateway.query_credentials(&RecordFilter::new()).await?;

        if let Some(states) = &msg.states {
            records.retain(|record| states.contains(&record.get_state()));
        }

        let paginate = msg
            .paginate
            .unwrap_or_else(|| Paginate::new(self.config.get_default_limit(), 0));

        let (results, page) = paginate.apply(records)?;
        Ok(AdminBody::CredentialsList(CredentialsList { results, page }))
    }

    async fn send_proposal(&self, msg: &SendCredentialProposal) -> Result<AdminBody, HolderError> {
        let connection = self
            .connections
            .retrieve(msg.connection_id.to_owned())
            .await?;

        if !connection.is_ready() {
            return Err(HolderError::ConnectionNotReady(msg.connection_id.to_owned()));
        }

        let proposal: CredentialProposal = msg.to_owned().into();
        let outbound_msg = proposal.to_message()?;

        let record = self.engine.create_proposal(proposal).await?;
        let outbound_msg = outbound_msg.with_thread(record.get_thread_id());
        debug!(
            "dispatching credential proposal: {} on connection: {}",
            outbound_msg.id,
            connection.get_id()
        );

        self.outbound
            .send(outbound_msg, connection.get_id())
            .await?;

        info!(
            "credential proposal sent, credential exchange: {}",
            record.get_id()
        );
        Ok(AdminBody::CredentialExchange(record))
    }

    async fn offer_accept(&self, msg: &CredentialOfferAccept) -> Result<AdminBody, HolderError> {
        let _guard = self.locks.acquire(&msg.credential_exchange_id).await;

        let record = self
            .gateway
            .get_credential(msg.credential_exchange_id.to_owned())
            .await?;

        if record.get_state() != State::OfferReceived {
            return Err(HolderError::InvalidCredentialExchange(format!(
                "credential exchange must be in {} state, current: {}",
                State::OfferReceived,
                record.get_state()
            )));
        }

        let connection = ready_connection(&self.connections, record.get_connection_id()).await?;
        let holder_did = connection.get_my_did().ok_or_else(|| {
            HolderError::InvalidConnection(format!(
                "connection has no local did: {}",
                connection.get_id()
            ))
        })?;

        let (record, request_msg) = self.engine.create_request(record, holder_did).await?;
        self.outbound
            .send(request_msg, record.get_connection_id())
            .await?;

        info!(
            "credential request sent, credential exchange: {}",
            record.get_id()
        );
        Ok(AdminBody::CredentialRequestSent(record))
    }
}

#[async_trait]
impl<TRepo, TConnection, TEngine, TOutbound> MessageHandler
    for CredentialHandler<TRepo, TConnection, TEngine, TOutbound>
where
    TRepo: CredentialRepoBuilder + PresentationRepoBuilder,
    TConnection: ConnectionStore,
    TEngine: EngineBuilder,
    TOutbound: Outbound,
{
    fn handles(&self, message_type: MessageType) -> bool {
        matches!(
            message_type,
            MessageType::CredentialsGetList
                | MessageType::SendCredentialProposal
                | MessageType::CredentialOfferAccept
        )
    }

    async fn call(
        &self,
        ctx: &RequestContext,
        message: &AdminMessage,
    ) -> Result<AdminBody, HolderError> {
        ctx.ensure_admin()?;

        match message.get_body() {
            AdminBody::CredentialsGetList(msg) => self.get_list(msg).await,
            AdminBody::SendCredentialProposal(msg) => self.send_proposal(msg).await,
            AdminBody::CredentialOfferAccept(msg) => self.offer_accept(msg).await,
            _ => Err(unsupported(message)),
        }
    }
}
