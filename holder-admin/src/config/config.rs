use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

use super::{Admin, Events};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Config {
    #[serde(default)]
    pub(super) admin: Admin,

    #[serde(default)]
    pub(super) events: Events,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(mut self, admin: Admin) -> Self {
        self.admin = admin;
        self
    }

    pub fn with_events(mut self, events: Events) -> Self {
        self.events = events;
        self
    }

    pub fn admin(&self) -> &Admin {
        &self.admin
    }

    pub fn events(&self) -> &Events {
        &self.events
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin: Admin::default(),
            events: Events::default(),
        }
    }
}

impl ToValidate for Config {
    fn validate(&self) -> Result<(), CommonError> {
        _ = self.admin.validate()?;
        _ = self.events.validate()?;

        Ok(())
    }
}
