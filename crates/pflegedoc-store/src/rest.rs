//! REST client for the `documentation_entries` table.
//!
//! Talks a PostgREST-style interface: inserts and updates carry
//! `Prefer: return=representation` so every write hands back the resulting
//! row, and filters/ordering ride in the query string.

use chrono::Utc;
use pflegedoc_core::{
    Config, DocumentationEntry, EntryStatus, Mapping, Mode, OptimizationLevel,
    OptimizationResult, StoredEntry,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::StoreError;

const TABLE: &str = "documentation_entries";

/// Persistence seam for documentation entries.
///
/// Every operation degrades to an absent or empty result on failure — "not
/// found" and "backend error" are deliberately indistinguishable to callers,
/// with the cause diagnosable only via the log. Absence is terminal within a
/// single attempt; retries are up to the user re-triggering the action.
#[async_trait::async_trait]
pub trait EntryStore {
    /// Insert a new draft from a submission and its optimization result.
    async fn create(
        &self,
        entry: &DocumentationEntry,
        result: &OptimizationResult,
    ) -> Option<StoredEntry>;

    /// Replace the optimized text of a draft, bumping `updated_at`.
    async fn update_text(&self, id: &str, optimized_text: &str) -> Option<StoredEntry>;

    /// Freeze the entry: set the final text, `status = final`, `finalized_at`.
    async fn finalize(&self, id: &str, final_text: &str) -> Option<StoredEntry>;

    /// All entries, newest first.
    async fn list(&self) -> Vec<StoredEntry>;

    async fn get_by_id(&self, id: &str) -> Option<StoredEntry>;
}

/// [`EntryStore`] backed by a remote REST table endpoint.
pub struct RestEntryStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct NewRow<'a> {
    patient_name: &'a str,
    mode: Mode,
    original_text: &'a str,
    optimized_text: &'a str,
    optimization_level: OptimizationLevel,
    value_before: f64,
    value_after: f64,
    mappings: &'a [Mapping],
    status: EntryStatus,
}

impl RestEntryStore {
    /// `config.store_url` should be the API base, like
    /// `https://example.supabase.co/rest/v1` (no trailing slash).
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.store_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, TABLE)
    }

    async fn rows_from(&self, resp: reqwest::Response) -> Result<Vec<StoredEntry>, StoreError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }

    async fn try_insert(&self, row: &NewRow<'_>) -> Result<StoredEntry, StoreError> {
        let resp = self
            .client
            .post(self.table_url())
            .bearer_auth(&self.token)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let rows = self.rows_from(resp).await?;
        rows.into_iter().next().ok_or(StoreError::NoRows)
    }

    async fn try_patch(&self, id: &str, patch: &Value) -> Result<StoredEntry, StoreError> {
        let url = format!("{}?id=eq.{id}", self.table_url());
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let rows = self.rows_from(resp).await?;
        rows.into_iter().next().ok_or(StoreError::NoRows)
    }

    async fn try_select(&self, query: &str) -> Result<Vec<StoredEntry>, StoreError> {
        let url = format!("{}?{query}", self.table_url());
        let resp = self.client.get(&url).bearer_auth(&self.token).send().await?;
        self.rows_from(resp).await
    }
}

#[async_trait::async_trait]
impl EntryStore for RestEntryStore {
    async fn create(
        &self,
        entry: &DocumentationEntry,
        result: &OptimizationResult,
    ) -> Option<StoredEntry> {
        let row = NewRow {
            patient_name: &entry.patient_name,
            mode: entry.mode,
            original_text: &entry.original_text,
            optimized_text: &result.optimized_text,
            optimization_level: entry.optimization_level,
            value_before: result.value_estimate.value_before,
            value_after: result.value_estimate.value_after,
            mappings: &result.mappings,
            status: EntryStatus::Draft,
        };
        match self.try_insert(&row).await {
            Ok(stored) => {
                info!(id = %stored.id, "created draft entry");
                Some(stored)
            }
            Err(e) => {
                error!(error = %e, "failed to create entry");
                None
            }
        }
    }

    async fn update_text(&self, id: &str, optimized_text: &str) -> Option<StoredEntry> {
        let patch = json!({
            "optimized_text": optimized_text,
            "updated_at": Utc::now(),
        });
        match self.try_patch(id, &patch).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                error!(error = %e, id, "failed to update entry");
                None
            }
        }
    }

    async fn finalize(&self, id: &str, final_text: &str) -> Option<StoredEntry> {
        let now = Utc::now();
        let patch = json!({
            "optimized_text": final_text,
            "status": EntryStatus::Final,
            "finalized_at": now,
            "updated_at": now,
        });
        match self.try_patch(id, &patch).await {
            Ok(stored) => {
                info!(id = %stored.id, "finalized entry");
                Some(stored)
            }
            Err(e) => {
                error!(error = %e, id, "failed to finalize entry");
                None
            }
        }
    }

    async fn list(&self) -> Vec<StoredEntry> {
        match self.try_select("select=*&order=created_at.desc").await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "failed to list entries");
                Vec::new()
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Option<StoredEntry> {
        match self.try_select(&format!("id=eq.{id}&limit=1")).await {
            Ok(rows) => rows.into_iter().next(),
            Err(e) => {
                error!(error = %e, id, "failed to fetch entry");
                None
            }
        }
    }
}
