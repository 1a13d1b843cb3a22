use rst_common::standard::serde::Serialize;
use rst_common::standard::serde_json::{self, Map, Value};
use rst_common::standard::uuid::Uuid;

use prople_holder_core::holder::outbound::Thread;
use prople_holder_core::holder::{CredentialExchange, PresentationExchange};

use crate::common::types::CommonError;

use super::credential::{
    CredentialOfferAccept, CredentialsGetList, CredentialsList, SendCredentialProposal,
};
use super::presentation::{
    PresentationRequestApprove, PresentationRequestReceived, PresentationsGetList,
    PresentationsList, SendPresentationProposal,
};
use super::problem_report::ProblemReport;
use super::types::MessageType;

pub const TYPE_KEY: &str = "@type";
pub const ID_KEY: &str = "@id";
pub const THREAD_KEY: &str = "~thread";

/// `AdminBody` is the tagged union of every message kind of the family
#[derive(Debug, Clone, PartialEq)]
pub enum AdminBody {
    CredentialsGetList(CredentialsGetList),
    CredentialsList(CredentialsList),
    SendCredentialProposal(SendCredentialProposal),
    CredentialExchange(CredentialExchange),
    CredentialOfferReceived(CredentialExchange),
    CredentialOfferAccept(CredentialOfferAccept),
    CredentialRequestSent(CredentialExchange),
    CredentialReceived(CredentialExchange),
    PresentationsGetList(PresentationsGetList),
    PresentationsList(PresentationsList),
    SendPresentationProposal(SendPresentationProposal),
    PresentationExchange(PresentationExchange),
    PresentationRequestReceived(PresentationRequestReceived),
    PresentationRequestApprove(PresentationRequestApprove),
    PresentationSent(PresentationExchange),
    ProblemReport(ProblemReport),
}

impl AdminBody {
    pub fn message_type(&self) -> MessageType {
        match self {
            AdminBody::CredentialsGetList(_) => MessageType::CredentialsGetList,
            AdminBody::CredentialsList(_) => MessageType::CredentialsList,
            AdminBody::SendCredentialProposal(_) => MessageType::SendCredentialProposal,
            AdminBody::CredentialExchange(_) => MessageType::CredentialExchange,
            AdminBody::CredentialOfferReceived(_) => MessageType::CredentialOfferReceived,
            AdminBody::CredentialOfferAccept(_) => MessageType::CredentialOfferAccept,
            AdminBody::CredentialRequestSent(_) => MessageType::CredentialRequestSent,
            AdminBody::CredentialReceived(_) => MessageType::CredentialReceived,
            AdminBody::PresentationsGetList(_) => MessageType::PresentationsGetList,
            AdminBody::PresentationsList(_) => MessageType::PresentationsList,
            AdminBody::SendPresentationProposal(_) => MessageType::SendPresentationProposal,
            AdminBody::PresentationExchange(_) => MessageType::PresentationExchange,
            AdminBody::PresentationRequestReceived(_) => MessageType::PresentationRequestReceived,
            AdminBody::PresentationRequestApprove(_) => MessageType::PresentationRequestApprove,
            AdminBody::PresentationSent(_) => MessageType::PresentationSent,
            AdminBody::ProblemReport(_) => MessageType::ProblemReport,
        }
    }

    fn to_fields(&self) -> Result<Map<String, Value>, CommonError> {
        match self {
            AdminBody::CredentialsGetList(msg) => fields(msg),
            AdminBody::CredentialsList(msg) => fields(msg),
            AdminBody::SendCredentialProposal(msg) => fields(msg),
            AdminBody::CredentialExchange(record)
            | AdminBody::CredentialOfferReceived(record)
            | AdminBody::CredentialRequestSent(record)
            | AdminBody::CredentialReceived(record) => fields(record),
            AdminBody::CredentialOfferAccept(msg) => fields(msg),
            AdminBody::PresentationsGetList(msg) => fields(msg),
            AdminBody::PresentationsList(msg) => fields(msg),
            AdminBody::SendPresentationProposal(msg) => fields(msg),
            AdminBody::PresentationExchange(record) | AdminBody::PresentationSent(record) => {
                fields(record)
            }
            AdminBody::PresentationRequestReceived(msg) => fields(msg),
            AdminBody::PresentationRequestApprove(msg) => fields(msg),
            AdminBody::ProblemReport(msg) => fields(msg),
        }
    }
}

fn fields<T: Serialize>(msg: &T) -> Result<Map<String, Value>, CommonError> {
    let value = serde_json::to_value(msg).map_err(|err| CommonError::JSONError(err.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CommonError::JSONError(
            "message body must be a json object".to_string(),
        )),
    }
}

/// `AdminMessage` is a single message exchanged with an admin client
///
/// On the wire every field of the body sits at the top level of the JSON object,
/// next to the `@type`, `@id` and `~thread` decorators
#[derive(Debug, Clone, PartialEq)]
pub struct AdminMessage {
    id: String,
    thread: Option<Thread>,
    body: AdminBody,
}

impl AdminMessage {
    pub fn new(body: AdminBody) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            thread: None,
            body,
        }
    }

    pub(crate) fn from_parts(id: String, thread: Option<Thread>, body: AdminBody) -> Self {
        Self { id, thread, body }
    }

    /// `reply` builds a message answering `request`, on the request thread
    pub fn reply(request: &AdminMessage, body: AdminBody) -> Self {
        Self::new(body).with_thread(request.thread_id())
    }

    pub fn with_thread(mut self, thid: String) -> Self {
        self.thread = Some(Thread { thid });
        self
    }

    pub fn get_id(&self) -> String {
        self.id.to_owned()
    }

    pub fn get_body(&self) -> &AdminBody {
        &self.body
    }

    pub fn message_type(&self) -> MessageType {
        self.body.message_type()
    }

    /// `thread_id` falls back to the message id when the message opened the thread
    pub fn thread_id(&self) -> String {
        self.thread
            .as_ref()
            .map(|thread| thread.thid.to_owned())
            .unwrap_or_else(|| self.id.to_owned())
    }

    pub fn to_value(&self) -> Result<Value, CommonError> {
        let mut map = self.body.to_fields()?;
        map.insert(
            TYPE_KEY.to_string(),
            Value::from(self.message_type().uri()),
        );
        map.insert(ID_KEY.to_string(), Value::from(self.id.to_owned()));

        if let Some(thread) = &self.thread {
            let thread = serde_json::to_value(thread)
                .map_err(|err| CommonError::JSONError(err.to_string()))?;
            map.insert(THREAD_KEY.to_string(), thread);
        }

        Ok(Value::Object(map))
    }
}

/// `correlation` reads the thread id of a raw inbound message, used to answer a
/// message that could not be decoded
pub fn correlation(raw: &Value) -> Option<String> {
    raw.get(THREAD_KEY)
        .and_then(|thread| thread.get("thid"))
        .or_else(|| raw.get(ID_KEY))
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}
