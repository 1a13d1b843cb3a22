use rst_common::standard::serde::{self, Deserialize, Serialize};

use super::types::HolderError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: usize = 0;

/// `Paginate` is the cursor requested by an admin client, travelling as the `~paginate`
/// decorator. The window is purely positional, it depends only on the ordering of the
/// given records
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct Paginate {
    #[serde(default = "default_limit")]
    pub limit: i64,

    #[serde(default)]
    pub offset: usize,
}

/// `Page` describes the slice returned by [`Paginate::apply`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(crate = "self::serde")]
pub struct Page {
    pub count: usize,
    pub offset: usize,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Paginate {
    pub fn new(limit: i64, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// `apply` cuts the window out of `records`
    ///
    /// An offset beyond the end yields an empty slice. A limit of zero or below is
    /// rejected with [`HolderError::InvalidArgument`]
    pub fn apply<T>(&self, records: Vec<T>) -> Result<(Vec<T>, Page), HolderError> {
        if self.limit <= 0 {
            return Err(HolderError::InvalidArgument(format!(
                "paginate limit must be positive, given: {}",
                self.limit
            )));
        }

        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let start = self.offset.min(records.len());

        let slice: Vec<T> = records.into_iter().skip(start).take(limit).collect();
        let page = Page {
            count: slice.len(),
            offset: self.offset,
        };

        Ok((slice, page))
    }
}

impl Default for Paginate {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}
