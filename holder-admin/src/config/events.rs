use rst_common::standard::serde::{self, Deserialize};

use prople_holder_core::holder::events::DEFAULT_CHANNEL_CAPACITY;

use crate::common::types::{CommonError, ToValidate};

/// `Events` sizes the event bus. `channel_capacity` is the per subscriber backlog
/// above which a lagging subscriber is reported, events are never dropped
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Events {
    #[serde(default = "default_capacity")]
    pub(super) channel_capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Events {
    pub fn new(channel_capacity: usize) -> Self {
        Self { channel_capacity }
    }

    pub fn get_channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}

impl Default for Events {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ToValidate for Events {
    fn validate(&self) -> Result<(), CommonError> {
        if self.channel_capacity == 0 {
            return Err(CommonError::ValidationError(
                "config: events:channel_capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
