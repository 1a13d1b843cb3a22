use rst_common::with_errors::thiserror::{self, Error};

/// `HolderError` is the base error type of the `holder` domain
///
/// Every failure raised by a collaborator is mapped into one of these variants, so the
/// admin layer is able to turn it into a problem report with a proper retry hint.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HolderError {
    #[error("access denied")]
    AccessDenied,

    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("connection not ready: {0}")]
    ConnectionNotReady(String),

    #[error("invalid connection: {0}")]
    InvalidConnection(String),

    #[error("invalid credential exchange: {0}")]
    InvalidCredentialExchange(String),

    #[error("invalid presentation exchange: {0}")]
    InvalidPresentationExchange(String),

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store error: {0}")]
    StoreError(String),

    #[error("credential manager error: {0}")]
    CredentialManagerError(String),

    #[error("presentation manager error: {0}")]
    PresentationManagerError(String),

    #[error("wallet error: {0}")]
    WalletError(String),

    #[error("ledger error: {0}")]
    LedgerError(String),

    #[error("dispatch error: {0}")]
    DispatchError(String),

    #[error("json error: {0}")]
    JSONError(String),
}
