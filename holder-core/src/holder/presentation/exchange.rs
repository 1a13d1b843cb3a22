use std::collections::HashSet;

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

pub const WEBHOOK_TOPIC: &str = "acapy::record::present_proof";

/// `PresentationExchange` tracks a single presentation attempt
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "self::serde")]
pub struct PresentationExchange {
    #[serde(rename = "presentation_exchange_id")]
    pub(crate) id: String,
    pub(crate) connection_id: String,
    pub(crate) thread_id: String,
    pub(crate) role: Role,
    pub(crate) state: State,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) presentation_proposal_dict: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) presentation_request: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) presentation: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) verified: Option<bool>,

    #[serde(default)]
    pub(crate) auto_present: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error_msg: Option<String>,

    #[serde(with = "ts_seconds")]
    pub(crate) created_at: DateTime<Utc>,

    #[serde(with = "ts_seconds")]
    pub(crate) updated_at: DateTime<Utc>,
}

impl PresentationExchange {
    pub fn new(connection_id: String, thread_id: String, role: Role, state: State) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            connection_id,
            thread_id,
            role,
            state,
            presentation_proposal_dict: None,
            presentation_request: None,
            presentation: None,
            verified: None,
            auto_present: false,
            error_msg: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn set_state(&mut self, state: State) -> &mut Self {
        self.state = state;
        self.updated_at = Utc::now();
        self
    }

    pub fn set_presentation_proposal(&mut self, proposal: Value) -> &mut Self {
        self.presentation_proposal_dict = Some(proposal);
        self
    }

    pub fn set_presentation_request(&mut self, request: Value) -> &mut Self {
        self.presentation_request = Some(request);
        self
    }

    pub fn set_presentation(&mut self, presentation: Value) -> &mut Self {
        self.presentation = Some(presentation);
        self
    }

    pub fn set_verified(&mut self, verified: bool) -> &mut Self {
        self.verified = Some(verified);
        self
    }

    pub fn set_auto_present(&mut self, auto_present: bool) -> &mut Self {
        self.auto_present = auto_present;
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

    pub fn get_presentation_request(&self) -> Option<Value> {
        self.presentation_request.to_owned()
    }

    pub fn get_verified(&self) -> Option<bool> {
        self.verified
    }

    pub fn get_auto_present(&self) -> bool {
        self.auto_present
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `attribute_referents` lists the keys of `requested_attributes` from the stored
    /// proof request
    pub fn attribute_referents(&self) -> HashSet<String> {
        self.request_referents("requested_attributes")
    }

    /// `predicate_referents` lists the keys of `requested_predicates` from the stored
    /// proof request
    pub fn predicate_referents(&self) -> HashSet<String> {
        self.request_referents("requested_predicates")
    }

    fn request_referents(&self, section: &str) -> HashSet<String> {
        self.presentation_request
            .as_ref()
            .and_then(|request| request.get(section))
            .and_then(|referents| referents.as_object())
            .map(|referents| referents.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl WebhookRecord for PresentationExchange {
    const WEBHOOK_TOPIC: &'static str = WEBHOOK_TOPIC;

    fn topic_state(&self) -> String {
        self.state.to_string()
    }
}

impl ToJSON for PresentationExchange {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}

impl TryInto<Vec<u8>> for PresentationExchange {
    type Error = HolderError;

    fn try_into(self) -> Result<Vec<u8>, Self::Error> {
        let json =
            serde_json::to_vec(&self).map_err(|err| HolderError::JSONError(err.to_string()))?;
        Ok(json)
    }
}

impl TryFrom<Vec<u8>> for PresentationExchange {
    type Error = HolderError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        let record: PresentationExchange = serde_json::from_slice(&value)
            .map_err(|err| HolderError::JSONError(err.to_string()))?;
        Ok(record)
    }
}
