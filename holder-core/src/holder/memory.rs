use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::with_tokio::tokio::sync::RwLock;

use super::credential::types::RepoBuilder as CredentialRepoBuilder;
use super::gateway::{matches_tags, TagFilter};
use super::presentation::types::RepoBuilder as PresentationRepoBuilder;
use super::types::HolderError;
use super::{CredentialExchange, PresentationExchange};

/// `MemoryRepository` keeps exchange records in process, in insertion order
///
/// Used by agents embedding the admin layer without a persistent record store, and by
/// the end to end tests
#[derive(Clone, Default)]
pub struct MemoryRepository {
    credentials: Arc<RwLock<Vec<CredentialExchange>>>,
    presentations: Arc<RwLock<Vec<PresentationExchange>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepoBuilder for MemoryRepository {
    async fn query_credential_exchanges(
        &self,
        tags: TagFilter,
    ) -> Result<Vec<CredentialExchange>, HolderError> {
        let records = self.credentials.read().await;

        let mut found = Vec::new();
        for record in records.iter() {
            if matches_tags(record, &tags)? {
                found.push(record.to_owned());
            }
        }

        Ok(found)
    }

    async fn get_credential_exchange(
        &self,
        id: String,
    ) -> Result<CredentialExchange, HolderError> {
        let records = self.credentials.read().await;
        records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(HolderError::RecordNotFound(id))
    }

    async fn save_credential_exchange(
        &self,
        record: CredentialExchange,
    ) -> Result<(), HolderError> {
        let mut records = self.credentials.write().await;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        Ok(())
    }
}

#[async_trait]
impl PresentationRepoBuilder for MemoryRepository {
    async fn query_presentation_exchanges(
        &self,
        tags: TagFilter,
    ) -> Result<Vec<PresentationExchange>, HolderError> {
        let records = self.presentations.read().await;

        let mut found = Vec::new();
        for record in records.iter() {
            if matches_tags(record, &tags)? {
                found.push(record.to_owned());
            }
        }

        Ok(found)
    }

    async fn get_presentation_exchange(
        &self,
        id: String,
    ) -> Result<PresentationExchange, HolderError> {
        let records = self.presentations.read().await;
        records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(HolderError::RecordNotFound(id))
    }

    async fn save_presentation_exchange(
        &self,
        record: PresentationExchange,
    ) -> Result<(), HolderError> {
        let mut records = self.presentations.write().await;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        Ok(())
    }
}
