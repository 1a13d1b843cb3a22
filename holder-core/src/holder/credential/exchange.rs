use rst_common::standard::chrono::serde::ts_seconds;
use rst_common::standard::chrono::{DateTime, Utc};
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Value};
use rst_common::standard::uuid::Uuid;

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

use crate::holder::events::WebhookRecord;
use crate::holder::types::HolderError;

use super::types::{Role, State};

pub const WEBHOOK_TOPIC: &str = "acapy::record::issue_credential";

/// `CredentialExchange` tracks a single credential issuance attempt
///
/// Records are created and mutated by the issue credential engine. The admin layer
/// only reads them, and checks their state before asking the engine to move forward
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "self::serde")]
pub struct CredentialExchange {
    #[serde(rename = "credential_exchange_id")]
    pub(crate) id: String,
    pub(crate) connection_id: String,
    pub(crate) thread_id: String,
    pub(crate) role: Role,
    pub(crate) state: State,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) credential_definition_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) schema_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) credential_proposal_dict: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) credential_offer: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) credential_request: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) credential: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error_msg: Option<String>,

    #[serde(with = "ts_seconds")]
    pub(crate) created_at: DateTime<Utc>,

    #[serde(with = "ts_seconds")]
    pub(crate) updated_at: DateTime<Utc>,
}

impl CredentialExchange {
    pub fn new(connection_id: String, thread_id: String, role: Role, state: State) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            connection_id,
            thread_id,
            role,
            state,
            credential_definition_id: None,
            schema_id: None,
            credential_proposal_dict: None,
            credential_offer: None,
            credential_request: None,
            credential: None,
            error_msg: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// `advance` moves the record forward along the issuance lifecycle
    ///
    /// A transition to a state that is not strictly after the current one is rejected
    pub fn advance(&mut self, next: State) -> Result<&mut Self, HolderError> {
        if !self.state.can_advance_to(next) {
            return Err(HolderError::InvalidCredentialExchange(format!(
                "invalid transition from {} to {}",
                self.state, next
            )));
        }

        self.state = next;
        self.updated_at = Utc::now();
        Ok(self)
    }

    pub fn set_credential_definition_id(&mut self, cred_def_id: String) -> &mut Self {
        self.credential_definition_id = Some(cred_def_id);
        self
    }

    pub fn set_schema_id(&mut self, schema_id: String) -> &mut Self {
        self.schema_id = Some(schema_id);
        self
    }

    pub fn set_credential_proposal(&mut self, proposal: Value) -> &mut Self {
        self.credential_proposal_dict = Some(proposal);
        self
    }

    pub fn set_credential_offer(&mut self, offer: Value) -> &mut Self {
        self.credential_offer = Some(offer);
        self
    }

    pub fn set_credential_request(&mut self, request: Value) -> &mut Self {
        self.credential_request = Some(request);
        self
    }

    pub fn set_credential(&mut self, credential: Value) -> &mut Self {
        self.credential = Some(credential);
        self
    }

    pub fn set_error_msg(&mut self, msg: String) -> &mut Self {
        self.error_msg = Some(msg);
        self
    }

    pub fn get_id(&self) -> String {
        self.id.to_owned()
    }

    pub fn get_connection_id(&self) -> String {
        self.connection_id.to_owned()
    }

    pub fn get_thread_id(&self) -> String {
        self.thread_id.to_owned()
    }

    pub fn get_role(&self) -> Role {
        self.role
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    pub fn get_credential_definition_id(&self) -> Option<String> {
        self.credential_definition_id.to_owned()
    }

    pub fn get_credential_offer(&self) -> Option<Value> {
        self.credential_offer.to_owned()
    }

    pub fn get_credential(&self) -> Option<Value> {
        self.credential.to_owned()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl WebhookRecord for CredentialExchange {
    const WEBHOOK_TOPIC: &'static str = WEBHOOK_TOPIC;

    fn topic_state(&self) -> String {
        self.state.to_string()
    }
}

impl ToJSON for CredentialExchange {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}

impl TryInto<Vec<u8>> for CredentialExchange {
    type Error = HolderError;

    fn try_into(self) -> Result<Vec<u8>, Self::Error> {
        let json =
            serde_json::to_vec(&self).map_err(|err| HolderError::JSONError(err.to_string()))?;
        Ok(json)
    }
}

impl TryFrom<Vec<u8>> for CredentialExchange {
    type Error = HolderError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        let record: CredentialExchange = serde_json::from_slice(&value)
            .map_err(|err| HolderError::JSONError(err.to_string()))?;
        Ok(record)
    }
}
