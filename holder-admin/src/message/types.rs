use std::fmt;

use crate::common::types::CommonError;

pub const PROTOCOL: &str = "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/admin-holder/0.1";
pub const NAME: &str = "admin-holder";
pub const VERSION: &str = "0.1";
pub const TITLE: &str = "Holder Admin Protocol";

pub const NOTIFICATION_PROTOCOL: &str = "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/notification/1.0";

const CREDENTIALS_GET_LIST: &str = "credentials-get-list";
const CREDENTIALS_LIST: &str = "credentials-list";
const SEND_CREDENTIAL_PROPOSAL: &str = "send-credential-proposal";
const CREDENTIAL_EXCHANGE: &str = "credential-exchange";
const CREDENTIAL_OFFER_RECEIVED: &str = "credential-offer-received";
const CREDENTIAL_OFFER_ACCEPT: &str = "credential-offer-accept";
const CREDENTIAL_REQUEST_SENT: &str = "credential-request-sent";
const CREDENTIAL_RECEIVED: &str = "credential-received";
const PRESENTATIONS_GET_LIST: &str = "presentations-get-list";
const PRESENTATIONS_LIST: &str = "presentations-list";
const SEND_PRESENTATION_PROPOSAL: &str = "send-presentation-proposal";
const PRESENTATION_EXCHANGE: &str = "presentation-exchange";
const PRESENTATION_REQUEST_RECEIVED: &str = "presentation-request-received";
const PRESENTATION_REQUEST_APPROVE: &str = "presentation-request-approve";
const PRESENTATION_SENT: &str = "presentation-sent";
const PROBLEM_REPORT: &str = "problem-report";

/// `MessageType` names every message of the admin holder family, plus the
/// problem report borrowed from the notification family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    CredentialsGetList,
    CredentialsList,
    SendCredentialProposal,
    CredentialExchange,
    CredentialOfferReceived,
    CredentialOfferAccept,
    CredentialRequestSent,
    CredentialReceived,
    PresentationsGetList,
    PresentationsList,
    SendPresentationProposal,
    PresentationExchange,
    PresentationRequestReceived,
    PresentationRequestApprove,
    PresentationSent,
    ProblemReport,
}

impl MessageType {
    pub fn all() -> Vec<MessageType> {
        vec![
            MessageType::CredentialsGetList,
            MessageType::CredentialsList,
            MessageType::SendCredentialProposal,
            MessageType::CredentialExchange,
            MessageType::CredentialOfferReceived,
            MessageType::CredentialOfferAccept,
            MessageType::CredentialRequestSent,
            MessageType::CredentialReceived,
            MessageType::PresentationsGetList,
            MessageType::PresentationsList,
            MessageType::SendPresentationProposal,
            MessageType::PresentationExchange,
            MessageType::PresentationRequestReceived,
            MessageType::PresentationRequestApprove,
            MessageType::PresentationSent,
            MessageType::ProblemReport,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageType::CredentialsGetList => CREDENTIALS_GET_LIST,
            MessageType::CredentialsList => CREDENTIALS_LIST,
            MessageType::SendCredentialProposal => SEND_CREDENTIAL_PROPOSAL,
            MessageType::CredentialExchange => CREDENTIAL_EXCHANGE,
            MessageType::CredentialOfferReceived => CREDENTIAL_OFFER_RECEIVED,
            MessageType::CredentialOfferAccept => CREDENTIAL_OFFER_ACCEPT,
            MessageType::CredentialRequestSent => CREDENTIAL_REQUEST_SENT,
            MessageType::CredentialReceived => CREDENTIAL_RECEIVED,
            MessageType::PresentationsGetList => PRESENTATIONS_GET_LIST,
            MessageType::PresentationsList => PRESENTATIONS_LIST,
            MessageType::SendPresentationProposal => SEND_PRESENTATION_PROPOSAL,
            MessageType::PresentationExchange => PRESENTATION_EXCHANGE,
            MessageType::PresentationRequestReceived => PRESENTATION_REQUEST_RECEIVED,
            MessageType::PresentationRequestApprove => PRESENTATION_REQUEST_APPROVE,
            MessageType::PresentationSent => PRESENTATION_SENT,
            MessageType::ProblemReport => PROBLEM_REPORT,
        }
    }

    pub fn protocol(&self) -> &'static str {
        match self {
            MessageType::ProblemReport => NOTIFICATION_PROTOCOL,
            _ => PROTOCOL,
        }
    }

    /// `uri` is the full `@type` value, `<protocol>/<name>`
    pub fn uri(&self) -> String {
        format!("{}/{}", self.protocol(), self.name())
    }

    /// `is_inbound` is true for the commands an admin client is allowed to send
    pub fn is_inbound(&self) -> bool {
        matches!(
            self,
            MessageType::CredentialsGetList
                | MessageType::SendCredentialProposal
                | MessageType::CredentialOfferAccept
                | MessageType::PresentationsGetList
                | MessageType::SendPresentationProposal
                | MessageType::PresentationRequestApprove
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

impl TryFrom<&str> for MessageType {
    type Error = CommonError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (protocol, name) = value
            .rsplit_once('/')
            .ok_or_else(|| CommonError::MethodError(value.to_string()))?;

        MessageType::all()
            .into_iter()
            .find(|message_type| message_type.protocol() == protocol && message_type.name() == name)
            .ok_or_else(|| CommonError::MethodError(value.to_string()))
    }
}
