use std::fmt;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Map, Value};

use crate::holder::gateway::TagFilter;
use crate::holder::outbound::{DIDCommMessage, ISSUE_CREDENTIAL_PROPOSAL};
use crate::holder::types::HolderError;

use super::CredentialExchange;

pub const CREDENTIAL_PREVIEW_TYPE: &str =
    "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/issue-credential/1.0/credential-preview";

/// `State` is the issue credential state of a [`CredentialExchange`]
///
/// Holder side lifecycle:
///
/// ```text
/// proposal_sent -> offer_received -> request_sent -> credential_received -> credential_acked
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "snake_case")]
pub enum State {
    ProposalSent,
    ProposalReceived,
    OfferSent,
    OfferReceived,
    RequestSent,
    RequestReceived,
    CredentialIssued,
    CredentialReceived,
    CredentialAcked,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::ProposalSent => "proposal_sent",
            State::ProposalReceived => "proposal_received",
            State::OfferSent => "offer_sent",
            State::OfferReceived => "offer_received",
            State::RequestSent => "request_sent",
            State::RequestReceived => "request_received",
            State::CredentialIssued => "credential_issued",
            State::CredentialReceived => "credential_received",
            State::CredentialAcked => "credential_acked",
        }
    }

    /// issuer and holder states share the same step of the lifecycle
    fn step(&self) -> u8 {
        match self {
            State::ProposalSent | State::ProposalReceived => 0,
            State::OfferSent | State::OfferReceived => 1,
            State::RequestSent | State::RequestReceived => 2,
            State::CredentialIssued | State::CredentialReceived => 3,
            State::CredentialAcked => 4,
        }
    }

    pub fn can_advance_to(&self, next: State) -> bool {
        next.step() > self.step()
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
    Holder,
    Issuer,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct CredentialAttribute {
    pub name: String,

    #[serde(rename = "mime-type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    pub value: String,
}

/// `CredentialPreview` lists the attributes the holder would like to be issued
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct CredentialPreview {
    #[serde(rename = "@type")]
    #[serde(default = "default_preview_type")]
    pub preview_type: String,

    pub attributes: Vec<CredentialAttribute>,
}

fn default_preview_type() -> String {
    CREDENTIAL_PREVIEW_TYPE.to_string()
}

impl CredentialPreview {
    pub fn new(attributes: Vec<CredentialAttribute>) -> Self {
        Self {
            preview_type: default_preview_type(),
            attributes,
        }
    }
}

/// `CredentialProposal` is the input given to the engine when the holder opens an
/// issuance by proposing a credential
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct CredentialProposal {
    pub connection_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_proposal: Option<CredentialPreview>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_def_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
}

impl CredentialProposal {
    /// `to_message` builds the `propose-credential` message sent to the issuer
    pub fn to_message(&self) -> Result<DIDCommMessage, HolderError> {
        let value =
            serde_json::to_value(self).map_err(|err| HolderError::JSONError(err.to_string()))?;

        let mut body = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        body.remove("connection_id");

        Ok(DIDCommMessage::new(ISSUE_CREDENTIAL_PROPOSAL, body))
    }
}

/// `EngineBuilder` is the issue credential protocol engine as seen from the holder
#[async_trait]
pub trait EngineBuilder: Clone + Sync + Send {
    /// `create_proposal` creates and stores a new record in `proposal_sent` state
    async fn create_proposal(
        &self,
        proposal: CredentialProposal,
    ) -> Result<CredentialExchange, HolderError>;

    /// `create_request` builds the credential request answering the stored offer,
    /// moving the record to `request_sent`
    async fn create_request(
        &self,
        record: CredentialExchange,
        holder_did: String,
    ) -> Result<(CredentialExchange, DIDCommMessage), HolderError>;
}

/// `RepoBuilder` is the credential exchange collection of the record store
#[async_trait]
pub trait RepoBuilder: Clone + Sync + Send {
    async fn query_credential_exchanges(
        &self,
        tags: TagFilter,
    ) -> Result<Vec<CredentialExchange>, HolderError>;

    async fn get_credential_exchange(&self, id: String)
        -> Result<CredentialExchange, HolderError>;

    async fn save_credential_exchange(&self, record: CredentialExchange)
        -> Result<(), HolderError>;
}
