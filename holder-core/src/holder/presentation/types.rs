use std::collections::HashMap;
use std::fmt;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{Map, Value};

use crate::holder::gateway::TagFilter;
use crate::holder::outbound::{DIDCommMessage, PRESENT_PROOF_PROPOSAL};
use crate::holder::types::HolderError;

use super::PresentationExchange;

/// `State` is the present proof state of a [`PresentationExchange`]
///
/// Prover side lifecycle:
///
/// ```text
/// proposal_sent -> request_received -> presentation_sent -> presentation_acked
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "snake_case")]
pub enum State {
    ProposalSent,
    ProposalReceived,
    RequestSent,
    RequestReceived,
    PresentationSent,
    PresentationReceived,
    Verified,
    PresentationAcked,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::ProposalSent => "proposal_sent",
            State::ProposalReceived => "proposal_received",
            State::RequestSent => "request_sent",
            State::RequestReceived => "request_received",
            State::PresentationSent => "presentation_sent",
            State::PresentationReceived => "presentation_received",
            State::Verified => "verified",
            State::PresentationAcked => "presentation_acked",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Prover,
    Verifier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Prover => "prover",
            Role::Verifier => "verifier",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct RequestedAttribute {
    pub cred_id: String,

    #[serde(default = "default_revealed")]
    pub revealed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

fn default_revealed() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct RequestedPredicate {
    pub cred_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// `RequestedCredentials` is the holder selection used to build a presentation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct RequestedCredentials {
    pub self_attested_attributes: HashMap<String, String>,
    pub requested_attributes: HashMap<String, RequestedAttribute>,
    pub requested_predicates: HashMap<String, RequestedPredicate>,
}

impl RequestedCredentials {
    /// `unknown_referents` lists the selected referents missing from the proof request
    /// stored in `record`, sorted to keep error messages stable
    pub fn unknown_referents(&self, record: &PresentationExchange) -> Vec<String> {
        let attributes = record.attribute_referents();
        let predicates = record.predicate_referents();

        let mut unknown: Vec<String> = self
            .self_attested_attributes
            .keys()
            .chain(self.requested_attributes.keys())
            .filter(|referent| !attributes.contains(*referent))
            .chain(
                self.requested_predicates
                    .keys()
                    .filter(|referent| !predicates.contains(*referent)),
            )
            .cloned()
            .collect();

        unknown.sort();
        unknown.dedup();
        unknown
    }
}

/// `PresentationProposal` is the input given to the engine when the prover opens an
/// exchange by proposing a presentation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct PresentationProposal {
    pub connection_id: String,
    pub comment: Option<String>,
    pub presentation_proposal: Value,
    pub auto_present: bool,
}

impl PresentationProposal {
    /// `to_message` builds the `propose-presentation` message sent to the verifier
    pub fn to_message(&self) -> DIDCommMessage {
        let mut body = Map::new();
        if let Some(comment) = &self.comment {
            body.insert("comment".to_string(), Value::from(comment.to_owned()));
        }

        body.insert(
            "presentation_proposal".to_string(),
            self.presentation_proposal.to_owned(),
        );

        DIDCommMessage::new(PRESENT_PROOF_PROPOSAL, body)
    }
}

/// `EngineBuilder` is the present proof protocol engine as seen from the prover
#[async_trait]
pub trait EngineBuilder: Clone + Sync + Send {
    async fn create_exchange_for_proposal(
        &self,
        proposal: PresentationProposal,
    ) -> Result<PresentationExchange, HolderError>;

    /// `create_presentation` builds the presentation answering the stored proof request,
    /// moving the record to `presentation_sent`
    async fn create_presentation(
        &self,
        record: PresentationExchange,
        requested_credentials: RequestedCredentials,
        comment: Option<String>,
    ) -> Result<(PresentationExchange, DIDCommMessage), HolderError>;
}

/// `RepoBuilder` is the presentation exchange collection of the record store
#[async_trait]
pub trait RepoBuilder: Clone + Sync + Send {
    async fn query_presentation_exchanges(
        &self,
        tags: TagFilter,
    ) -> Result<Vec<PresentationExchange>, HolderError>;

    async fn get_presentation_exchange(
        &self,
        id: String,
    ) -> Result<PresentationExchange, HolderError>;

    async fn save_presentation_exchange(
        &self,
        record: PresentationExchange,
    ) -> Result<(), HolderError>;
}

/// `CredentialStoreBuilder` is the holder wallet, used to look up the stored
/// credentials able to satisfy a proof request
#[async_trait]
pub trait CredentialStoreBuilder: Clone + Sync + Send {
    async fn get_matching_credentials(
        &self,
        proof_request: Value,
        referents: Vec<String>,
        offset: usize,
        limit: usize,
        extra_query: Value,
    ) -> Result<Vec<Value>, HolderError>;
}
