use std::collections::HashMap;

use rst_common::standard::serde::Serialize;
use rst_common::standard::serde_json::{self, Value};

use super::credential::types::RepoBuilder as CredentialRepoBuilder;
use super::presentation::types::RepoBuilder as PresentationRepoBuilder;
use super::types::HolderError;
use super::{CredentialExchange, PresentationExchange};

/// `TagFilter` is evaluated by the record store itself, as exact string matches
pub type TagFilter = HashMap<String, String>;

/// `RecordFilter` combines the native store filter with a positive post filter,
/// an attribute equality predicate evaluated on the serialized record once the
/// store query returns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    tags: TagFilter,
    post_filter_positive: HashMap<String, Value>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, key: &str, value: String) -> Self {
        self.tags.insert(key.to_string(), value);
        self
    }

    /// `with_post` ignores a missing value, so optional query fields can be chained
    /// without branching
    pub fn with_post(mut self, key: &str, value: Option<Value>) -> Self {
        if let Some(value) = value {
            self.post_filter_positive.insert(key.to_string(), value);
        }

        self
    }

    pub fn tags(&self) -> TagFilter {
        self.tags.to_owned()
    }

    pub fn post_matches<T: Serialize>(&self, record: &T) -> Result<bool, HolderError> {
        if self.post_filter_positive.is_empty() {
            return Ok(true);
        }

        let value =
            serde_json::to_value(record).map_err(|err| HolderError::JSONError(err.to_string()))?;

        Ok(self
            .post_filter_positive
            .iter()
            .all(|(key, expected)| value.get(key) == Some(expected)))
    }

    fn apply<T: Serialize>(&self, records: Vec<T>) -> Result<Vec<T>, HolderError> {
        let mut filtered = Vec::with_capacity(records.len());
        for record in records {
            if self.post_matches(&record)? {
                filtered.push(record);
            }
        }

        Ok(filtered)
    }
}

/// `matches_tags` is the exact match rule expected from a store evaluating a [`TagFilter`]
pub fn matches_tags<T: Serialize>(record: &T, tags: &TagFilter) -> Result<bool, HolderError> {
    if tags.is_empty() {
        return Ok(true);
    }

    let value =
        serde_json::to_value(record).map_err(|err| HolderError::JSONError(err.to_string()))?;

    Ok(tags.iter().all(|(key, expected)| {
        value
            .get(key)
            .and_then(|field| field.as_str())
            .map(|field| field == expected)
            .unwrap_or(false)
    }))
}

/// `Gateway` is the read only access to both exchange record collections
///
/// Store failures are propagated untouched, the caller decides how to report them
#[derive(Clone)]
pub struct Gateway<TRepo>
where
    TRepo: CredentialRepoBuilder + PresentationRepoBuilder,
{
    repo: TRepo,
}

impl<TRepo> Gateway<TRepo>
where
    TRepo: CredentialRepoBuilder + PresentationRepoBuilder,
{
    pub fn new(repo: TRepo) -> Self {
        Self { repo }
    }

    pub async fn query_credentials(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<CredentialExchange>, HolderError> {
        let records = self.repo.query_credential_exchanges(filter.tags()).await?;
        filter.apply(records)
    }

    pub async fn get_credential(&self, id: String) -> Result<CredentialExchange, HolderError> {
        self.repo.get_credential_exchange(id).await
    }

    pub async fn query_presentations(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<PresentationExchange>, HolderError> {
        let records = self.repo.query_presentation_exchanges(filter.tags()).await?;
        filter.apply(records)
    }

    pub async fn get_presentation(&self, id: String) -> Result<PresentationExchange, HolderError> {
        self.repo.get_presentation_exchange(id).await
    }
}
