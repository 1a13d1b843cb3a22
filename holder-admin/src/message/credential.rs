use rst_common::standard::serde::{self, Deserialize, Serialize};

use prople_holder_core::holder::credential::types::{CredentialPreview, CredentialProposal, State};
use prople_holder_core::holder::pagination::{Page, Paginate};
use prople_holder_core::holder::CredentialExchange;

use crate::common::helpers;
use crate::common::types::{CommonError, ToValidate};

/// `CredentialsGetList` asks for the stored credential exchanges, optionally restricted
/// to a set of states
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(crate = "self::serde")]
pub struct CredentialsGetList {
    #[serde(rename = "~paginate")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginate: Option<Paginate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<State>>,
}

impl ToValidate for CredentialsGetList {
    fn validate(&self) -> Result<(), CommonError> {
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct CredentialsList {
    pub results: Vec<CredentialExchange>,

    #[serde(rename = "~page")]
    pub page: Page,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct SendCredentialProposal {
    pub connection_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_proposal: Option<CredentialPreview>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cred_def_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
}

impl From<SendCredentialProposal> for CredentialProposal {
    fn from(value: SendCredentialProposal) -> Self {
        CredentialProposal {
            connection_id: value.connection_id,
            comment: value.comment,
            credential_proposal: value.credential_proposal,
            cred_def_id: value.cred_def_id,
            schema_id: value.schema_id,
        }
    }
}

impl ToValidate for SendCredentialProposal {
    fn validate(&self) -> Result<(), CommonError> {
        helpers::required("send-credential-proposal:connection_id", &self.connection_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct CredentialOfferAccept {
    pub credential_exchange_id: String,
}

impl ToValidate for CredentialOfferAccept {
    fn validate(&self) -> Result<(), CommonError> {
        helpers::required(
            "credential-offer-accept:credential_exchange_id",
            &self.credential_exchange_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rst_common::standard::serde_json::{self, json};

    #[test]
    fn test_get_list_decode_states() {
        let msg: CredentialsGetList = serde_json::from_value(json!({
            "~paginate": {"limit": 5},
            "states": ["offer_received", "credential_acked"]
        }))
        .unwrap();

        assert_eq!(msg.paginate, Some(Paginate::new(5, 0)));
        assert_eq!(
            msg.states,
            Some(vec![State::OfferReceived, State::CredentialAcked])
        );
    }

    #[test]
    fn test_get_list_decode_unknown_state() {
        let msg: Result<CredentialsGetList, _> =
            serde_json::from_value(json!({"states": ["accepted"]}));
        assert!(msg.is_err());
    }

    #[test]
    fn test_proposal_validation() {
        let msg: SendCredentialProposal =
            serde_json::from_value(json!({"connection_id": ""})).unwrap();

        let validation = helpers::validate(msg);
        assert!(validation
            .unwrap_err()
            .to_string()
            .contains("send-credential-proposal:connection_id"));
    }

    #[test]
    fn test_proposal_into_engine_input() {
        let msg: SendCredentialProposal = serde_json::from_value(json!({
            "connection_id": "conn-id",
            "cred_def_id": "cred-def",
            "credential_proposal": {
                "attributes": [{"name": "name", "value": "alice"}]
            }
        }))
        .unwrap();

        let proposal: CredentialProposal = msg.into();
        assert_eq!(proposal.connection_id, "conn-id");
        assert_eq!(proposal.cred_def_id, Some("cred-def".to_string()));
        assert_eq!(
            proposal.credential_proposal.unwrap().attributes[0].value,
            "alice"
        );
    }
}
