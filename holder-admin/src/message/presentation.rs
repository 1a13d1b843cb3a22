use std::collections::HashMap;

use rst_common::standard::serde::{self, de, Deserialize, Deserializer, Serialize};
use rst_common::standard::serde_json::Value;

use prople_holder_core::holder::pagination::{Page, Paginate};
use prople_holder_core::holder::presentation::types::{
    PresentationProposal, RequestedAttribute, RequestedCredentials, RequestedPredicate,
};
use prople_holder_core::holder::PresentationExchange;

use crate::common::helpers;
use crate::common::types::{CommonError, ToValidate};

/// `PresentationsGetList` asks for the prover side presentation exchanges
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct PresentationsGetList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_verified")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,

    #[serde(rename = "~paginate")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginate: Option<Paginate>,
}

/// `verified` is accepted both as a boolean and as its `"true"` / `"false"` string form
fn deserialize_verified<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(crate = "self::serde")]
    #[serde(untagged)]
    enum Verified {
        Flag(bool),
        Text(String),
    }

    match Option::<Verified>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Verified::Flag(flag)) => Ok(Some(flag)),
        Some(Verified::Text(text)) => match text.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(de::Error::custom(format!(
                "verified must be true or false, given: {}",
                other
            ))),
        },
    }
}

impl ToValidate for PresentationsGetList {
    fn validate(&self) -> Result<(), CommonError> {
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct PresentationsList {
    pub results: Vec<PresentationExchange>,

    #[serde(rename = "~page")]
    pub page: Page,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct SendPresentationProposal {
    pub connection_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub presentation_proposal: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_present: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,
}

impl SendPresentationProposal {
    /// `to_proposal` resolves `auto_present`, an explicit flag always wins over
    /// `default_auto_present`
    pub fn to_proposal(&self, default_auto_present: bool) -> PresentationProposal {
        PresentationProposal {
            connection_id: self.connection_id.to_owned(),
            comment: self.comment.to_owned(),
            presentation_proposal: self.presentation_proposal.to_owned(),
            auto_present: self.auto_present.unwrap_or(default_auto_present),
        }
    }
}

impl ToValidate for SendPresentationProposal {
    fn validate(&self) -> Result<(), CommonError> {
        helpers::required("send-presentation-proposal:connection_id", &self.connection_id)
    }
}

/// `PresentationRequestReceived` notifies admins about a new proof request, together
/// with the holder credentials able to answer it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct PresentationRequestReceived {
    pub record: PresentationExchange,

    #[serde(default)]
    pub matching_credentials: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
}

impl PresentationRequestReceived {
    pub fn new(record: PresentationExchange) -> Self {
        Self {
            record,
            matching_credentials: Vec::new(),
            page: None,
        }
    }

    pub fn with_matching_credentials(mut self, credentials: Vec<Value>) -> Self {
        self.page = Some(Page {
            count: credentials.len(),
            offset: 0,
        });
        self.matching_credentials = credentials;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct PresentationRequestApprove {
    pub presentation_exchange_id: String,

    pub self_attested_attributes: HashMap<String, String>,
    pub requested_attributes: HashMap<String, RequestedAttribute>,
    pub requested_predicates: HashMap<String, RequestedPredicate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl PresentationRequestApprove {
    pub fn requested_credentials(&self) -> RequestedCredentials {
        RequestedCredentials {
            self_attested_attributes: self.self_attested_attributes.to_owned(),
            requested_attributes: self.requested_attributes.to_owned(),
            requested_predicates: self.requested_predicates.to_owned(),
        }
    }
}

impl ToValidate for PresentationRequestApprove {
    fn validate(&self) -> Result<(), CommonError> {
        helpers::required(
            "presentation-request-approve:presentation_exchange_id",
            &self.presentation_exchange_id,
        )
    }
}
