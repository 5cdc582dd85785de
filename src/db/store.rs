use std::collections::HashSet;

use async_trait::async_trait;

use crate::{
    db::{connection::Database, models::FieldRecord},
    error::{MenuSyncError, Result},
};

/// Read access to recorded field values, as the menu code needs it.
#[async_trait]
pub trait ValueStore: Send + Sync {
    /// Non-input records on exactly `domain`, ordered by (last used desc, field name asc),
    /// at most `limit`. Records that sanitize to nothing are skipped before counting.
    /// An empty domain yields nothing.
    async fn query_by_domain(&self, domain: &str, limit: usize) -> Result<Vec<FieldRecord>>;

    /// Newest non-input, non-blank records that are not on `domain` and not in
    /// `excluded`, at most `limit`.
    async fn query_by_recency(
        &self,
        domain: &str,
        limit: usize,
        excluded: &HashSet<i64>,
    ) -> Result<Vec<FieldRecord>>;

    async fn get_by_primary_key(&self, primary_key: i64) -> Result<Option<FieldRecord>>;
}

#[async_trait]
impl ValueStore for Database {
    async fn query_by_domain(&self, domain: &str, limit: usize) -> Result<Vec<FieldRecord>> {
        if domain.is_empty() {
            return Ok(Vec::new());
        }
        self.field_records_for_domain(domain, limit)
            .await
            .map_err(MenuSyncError::store)
    }

    async fn query_by_recency(
        &self,
        domain: &str,
        limit: usize,
        excluded: &HashSet<i64>,
    ) -> Result<Vec<FieldRecord>> {
        self.recent_field_records(domain, limit, excluded.clone())
            .await
            .map_err(MenuSyncError::store)
    }

    async fn get_by_primary_key(&self, primary_key: i64) -> Result<Option<FieldRecord>> {
        self.get_field_record(primary_key)
            .await
            .map_err(MenuSyncError::store)
    }
}
