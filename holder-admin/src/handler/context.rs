use prople_holder_core::holder::types::HolderError;

/// `Channel` is the origin of an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Admin,
    Peer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    channel: Channel,
    connection_id: Option<String>,
}

impl RequestContext {
    pub fn admin() -> Self {
        Self {
            channel: Channel::Admin,
            connection_id: None,
        }
    }

    pub fn peer(connection_id: String) -> Self {
        Self {
            channel: Channel::Peer,
            connection_id: Some(connection_id),
        }
    }

    pub fn get_channel(&self) -> Channel {
        self.channel
    }

    pub fn get_connection_id(&self) -> Option<String> {
        self.connection_id.to_owned()
    }

    pub fn is_admin(&self) -> bool {
        self.channel == Channel::Admin
    }

    pub fn ensure_admin(&self) -> Result<(), HolderError> {
        if !self.is_admin() {
            return Err(HolderError::AccessDenied);
        }

        Ok(())
    }
}
