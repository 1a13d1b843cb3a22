use std::collections::HashMap;

use rst_common::standard::serde::de::DeserializeOwned;
use rst_common::standard::serde_json::{self, Value};
use rst_common::standard::uuid::Uuid;

use prople_holder_core::holder::outbound::Thread;

use crate::common::types::{CommonError, ToValidate};

use super::envelope::{AdminBody, AdminMessage, ID_KEY, THREAD_KEY, TYPE_KEY};
use super::types::MessageType;

pub type DecodeFn = fn(Value) -> Result<AdminBody, CommonError>;

#[derive(Clone)]
pub struct Route {
    pub message_type: MessageType,
    pub decode: DecodeFn,
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, CommonError> {
    serde_json::from_value(value).map_err(|err| CommonError::DecodeError(err.to_string()))
}

fn parse_valid<T: DeserializeOwned + ToValidate>(value: Value) -> Result<T, CommonError> {
    let msg: T = parse(value)?;
    msg.validate()?;
    Ok(msg)
}

/// `Registry` maps every `@type` of the family to its decoder
#[derive(Clone)]
pub struct Registry {
    routes: HashMap<String, Route>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self {
            routes: HashMap::new(),
        };

        registry
            .register(MessageType::CredentialsGetList, |value| {
                Ok(AdminBody::CredentialsGetList(parse_valid(value)?))
            })
            .register(MessageType::CredentialsList, |value| {
                Ok(AdminBody::CredentialsList(parse(value)?))
            })
            .register(MessageType::SendCredentialProposal, |value| {
                Ok(AdminBody::SendCredentialProposal(parse_valid(value)?))
            })
            .register(MessageType::CredentialExchange, |value| {
                Ok(AdminBody::CredentialExchange(parse(value)?))
            })
            .register(MessageType::CredentialOfferReceived, |value| {
                Ok(AdminBody::CredentialOfferReceived(parse(value)?))
            })
            .register(MessageType::CredentialOfferAccept, |value| {
                Ok(AdminBody::CredentialOfferAccept(parse_valid(value)?))
            })
            .register(MessageType::CredentialRequestSent, |value| {
                Ok(AdminBody::CredentialRequestSent(parse(value)?))
            })
            .register(MessageType::CredentialReceived, |value| {
                Ok(AdminBody::CredentialReceived(parse(value)?))
            })
            .register(MessageType::PresentationsGetList, |value| {
                Ok(AdminBody::PresentationsGetList(parse_valid(value)?))
            })
            .register(MessageType::PresentationsList, |value| {
                Ok(AdminBody::PresentationsList(parse(value)?))
            })
            .register(MessageType::SendPresentationProposal, |value| {
                Ok(AdminBody::SendPresentationProposal(parse_valid(value)?))
            })
            .register(MessageType::PresentationExchange, |value| {
                Ok(AdminBody::PresentationExchange(parse(value)?))
            })
            .register(MessageType::PresentationRequestReceived, |value| {
                Ok(AdminBody::PresentationRequestReceived(parse(value)?))
            })
            .register(MessageType::PresentationRequestApprove, |value| {
                Ok(AdminBody::PresentationRequestApprove(parse_valid(value)?))
            })
            .register(MessageType::PresentationSent, |value| {
                Ok(AdminBody::PresentationSent(parse(value)?))
            })
            .register(MessageType::ProblemReport, |value| {
                Ok(AdminBody::ProblemReport(parse(value)?))
            });

        registry
    }

    fn register(&mut self, message_type: MessageType, decode: DecodeFn) -> &mut Self {
        self.routes.insert(
            message_type.uri(),
            Route {
                message_type,
                decode,
            },
        );
        self
    }

    /// `message_types` lists the registered `@type` values, sorted
    pub fn message_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.routes.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn route(&self, uri: &str) -> Option<&Route> {
        self.routes.get(uri)
    }

    /// `decode` turns a raw JSON object into an [`AdminMessage`]
    ///
    /// An unknown `@type` is a [`CommonError::MethodError`], a malformed envelope or
    /// body is a [`CommonError::DecodeError`], an inbound command failing its own
    /// checks is a [`CommonError::ValidationError`]
    pub fn decode(&self, raw: Value) -> Result<AdminMessage, CommonError> {
        let mut map = match raw {
            Value::Object(map) => map,
            _ => {
                return Err(CommonError::DecodeError(
                    "admin message must be a json object".to_string(),
                ))
            }
        };

        let uri = match map.remove(TYPE_KEY) {
            Some(Value::String(uri)) => uri,
            _ => {
                return Err(CommonError::DecodeError(format!(
                    "missing or invalid {}",
                    TYPE_KEY
                )))
            }
        };

        let route = self
            .route(&uri)
            .ok_or_else(|| CommonError::MethodError(uri.to_owned()))?;

        let id = match map.remove(ID_KEY) {
            Some(Value::String(id)) => id,
            Some(_) => return Err(CommonError::DecodeError(format!("invalid {}", ID_KEY))),
            None => Uuid::new_v4().to_string(),
        };

        let thread = match map.remove(THREAD_KEY) {
            Some(value) => Some(parse::<Thread>(value)?),
            None => None,
        };

        let body = (route.decode)(Value::Object(map))?;
        Ok(AdminMessage::from_parts(id, thread, body))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
