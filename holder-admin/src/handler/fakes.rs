use mockall::mock;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde_json::{json, Map, Value};

use prople_holder_core::holder::connection::{Connection, ConnectionStore, State as ConnectionState};
use prople_holder_core::holder::credential::types::{
    CredentialProposal, EngineBuilder as CredentialEngine, Role as CredentialRole,
    State as CredentialState,
};
use prople_holder_core::holder::outbound::{DIDCommMessage, Outbound};
use prople_holder_core::holder::presentation::types::{
    CredentialStoreBuilder, EngineBuilder as PresentationEngine, PresentationProposal,
    RequestedCredentials, Role as PresentationRole, State as PresentationState,
};
use prople_holder_core::holder::types::HolderError;
use prople_holder_core::holder::{CredentialExchange, PresentationExchange};

mock!(
    pub FakeConnections{}

    impl Clone for FakeConnections {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl ConnectionStore for FakeConnections {
        async fn retrieve(&self, connection_id: String) -> Result<Connection, HolderError>;
    }
);

mock!(
    pub FakeCredentialEngine{}

    impl Clone for FakeCredentialEngine {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl CredentialEngine for FakeCredentialEngine {
        async fn create_proposal(
            &self,
            proposal: CredentialProposal,
        ) -> Result<CredentialExchange, HolderError>;

        async fn create_request(
            &self,
            record: CredentialExchange,
            holder_did: String,
        ) -> Result<(CredentialExchange, DIDCommMessage), HolderError>;
    }
);

mock!(
    pub FakePresentationEngine{}

    impl Clone for FakePresentationEngine {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl PresentationEngine for FakePresentationEngine {
        async fn create_exchange_for_proposal(
            &self,
            proposal: PresentationProposal,
        ) -> Result<PresentationExchange, HolderError>;

        async fn create_presentation(
            &self,
            record: PresentationExchange,
            requested_credentials: RequestedCredentials,
            comment: Option<String>,
        ) -> Result<(PresentationExchange, DIDCommMessage), HolderError>;
    }
);

mock!(
    pub FakeOutbound{}

    impl Clone for FakeOutbound {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Outbound for FakeOutbound {
        async fn send(&self, message: DIDCommMessage, connection_id: String)
            -> Result<(), HolderError>;
    }
);

mock!(
    pub FakeCredentialStore{}

    impl Clone for FakeCredentialStore {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl CredentialStoreBuilder for FakeCredentialStore {
        async fn get_matching_credentials(
            &self,
            proof_request: Value,
            referents: Vec<String>,
            offset: usize,
            limit: usize,
            extra_query: Value,
        ) -> Result<Vec<Value>, HolderError>;
    }
);

pub fn connection(connection_id: &str, state: ConnectionState) -> Connection {
    let mut connection = Connection::new(connection_id.to_string(), state);
    connection.set_dids("did:sov:holder".to_string(), "did:sov:issuer".to_string());
    connection
}

pub fn connections_with(connection: Connection) -> MockFakeConnections {
    let mut connections = MockFakeConnections::new();
    connections
        .expect_retrieve()
        .returning(move |connection_id| {
            if connection_id == connection.get_id() {
                Ok(connection.clone())
            } else {
                Err(HolderError::ConnectionNotFound(connection_id))
            }
        });

    connections
}

pub fn credential_record(connection_id: &str, state: CredentialState) -> CredentialExchange {
    CredentialExchange::new(
        connection_id.to_string(),
        "cred-thread".to_string(),
        CredentialRole::Holder,
        state,
    )
}

pub fn presentation_record(connection_id: &str, state: PresentationState) -> PresentationExchange {
    let mut record = PresentationExchange::new(
        connection_id.to_string(),
        "pres-thread".to_string(),
        PresentationRole::Prover,
        state,
    );

    record.set_presentation_request(json!({
        "name": "proof",
        "version": "1.0",
        "requested_attributes": {
            "attr_name": {"name": "name"}
        },
        "requested_predicates": {
            "pred_age": {"name": "age", "p_type": ">=", "p_value": 18}
        }
    }));

    record
}

pub fn protocol_message(message_type: &str) -> DIDCommMessage {
    DIDCommMessage::new(message_type, Map::new())
}
