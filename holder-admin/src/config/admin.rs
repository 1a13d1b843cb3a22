use rst_common::standard::serde::{self, Deserialize};

use prople_holder_core::holder::pagination::DEFAULT_LIMIT;

use crate::common::types::{CommonError, ToValidate};

/// `Admin` holds the settings applied by the admin command handlers and the event bridge
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Admin {
    #[serde(default = "default_limit")]
    pub(super) default_limit: i64,

    #[serde(default = "default_limit")]
    pub(super) matching_credentials_limit: i64,

    /// debug default used when a presentation proposal does not carry `auto_present`
    #[serde(default)]
    pub(super) auto_respond_presentation_request: bool,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Admin {
    pub fn new(
        default_limit: i64,
        matching_credentials_limit: i64,
        auto_respond_presentation_request: bool,
    ) -> Self {
        Self {
            default_limit,
            matching_credentials_limit,
            auto_respond_presentation_request,
        }
    }

    pub fn get_default_limit(&self) -> i64 {
        self.default_limit
    }

    pub fn get_matching_credentials_limit(&self) -> i64 {
        self.matching_credentials_limit
    }

    pub fn get_auto_respond_presentation_request(&self) -> bool {
        self.auto_respond_presentation_request
    }
}

impl Default for Admin {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            matching_credentials_limit: DEFAULT_LIMIT,
            auto_respond_presentation_request: false,
        }
    }
}

impl ToValidate for Admin {
    fn validate(&self) -> Result<(), CommonError> {
        if self.default_limit <= 0 {
            return Err(CommonError::ValidationError(
                "config: admin:default_limit must be positive".to_string(),
            ));
        }

        if self.matching_credentials_limit <= 0 {
            return Err(CommonError::ValidationError(
                "config: admin:matching_credentials_limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
