use rst_common::standard::serde::{self, Deserialize, Serialize};

use prople_holder_core::holder::types::HolderError;

use crate::common::types::CommonError;

/// `WhoRetries` tells the admin client which party is expected to try again
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "lowercase")]
pub enum WhoRetries {
    None,
    Holder,
    Issuer,
    Both,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct ProblemReport {
    pub explain_ltxt: String,
    pub who_retries: WhoRetries,
}

impl ProblemReport {
    pub fn new(explain_ltxt: String, who_retries: WhoRetries) -> Self {
        Self {
            explain_ltxt,
            who_retries,
        }
    }
}

impl From<&HolderError> for ProblemReport {
    fn from(err: &HolderError) -> Self {
        let who_retries = match err {
            HolderError::StoreError(_) | HolderError::DispatchError(_) => WhoRetries::Holder,
            _ => WhoRetries::None,
        };

        ProblemReport::new(err.to_string(), who_retries)
    }
}

impl From<&CommonError> for ProblemReport {
    fn from(err: &CommonError) -> Self {
        ProblemReport::new(err.to_string(), WhoRetries::None)
    }
}
