//! Record store access: the `RecordStore` seam, the Airtable-backed
//! implementation, and `fetch_all`, which walks a table's pages.

use crate::config::StoreSettings;
use crate::error::{GanttError, Result};
use crate::record::{Page, RawRecord};
use reqwest::{Client, StatusCode, Url};
use std::future::Future;
use tracing::{debug, warn};

/// Page size requested from the store. Airtable caps this at 100.
pub const PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// A table-oriented store that lists records one page at a time.
pub trait RecordStore: Send + Sync {
    /// Fetch one page of `table`, continuing from `offset` when given.
    ///
    /// A table that does not exist must be reported as
    /// [`GanttError::TableNotFound`].
    fn list_page(
        &self,
        table: &str,
        offset: Option<&str>,
    ) -> impl Future<Output = Result<Page>> + Send;
}

/// Fetch every record of `table`, following the pagination cursor until the
/// store stops returning one. Records keep upstream order.
///
/// A missing table yields an empty list. A transient page failure is retried
/// once before surfacing.
pub async fn fetch_all<S: RecordStore>(store: &S, table: &str) -> Result<Vec<RawRecord>> {
    match fetch_required(store, table).await {
        Err(GanttError::TableNotFound(_)) => {
            debug!(table = %table, "table not found, treating as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Like [`fetch_all`], but a missing table is reported as
/// [`GanttError::TableNotFound`] instead of an empty list.
pub async fn fetch_required<S: RecordStore>(store: &S, table: &str) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    let mut offset: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(store, table, offset.as_deref()).await?;
        pages += 1;
        records.extend(page.records);

        match page.offset {
            Some(next) if !next.is_empty() => {
                if offset.as_deref() == Some(next.as_str()) {
                    warn!(table = %table, offset = %next, "store repeated a cursor, stopping");
                    break;
                }
                offset = Some(next);
            }
            _ => break,
        }
    }

    debug!(table = %table, pages, records = records.len(), "fetched table");
    Ok(records)
}

async fn fetch_page<S: RecordStore>(store: &S, table: &str, offset: Option<&str>) -> Result<Page> {
    match store.list_page(table, offset).await {
        Err(e) if e.is_transient() => {
            warn!(table = %table, error = %e, "page request failed, retrying once");
            store.list_page(table, offset).await
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// AirtableStore
// ---------------------------------------------------------------------------

/// `RecordStore` over the Airtable REST API.
pub struct AirtableStore {
    client: Client,
    settings: StoreSettings,
    base_url: Url,
}

impl AirtableStore {
    /// Build a store client. Fails before any request when credentials are
    /// missing or the API url does not parse.
    pub fn new(settings: StoreSettings) -> Result<Self> {
        settings.validate()?;
        let base_url = Url::parse(&settings.api_url)
            .map_err(|_| GanttError::InvalidStoreUrl(settings.api_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(GanttError::InvalidStoreUrl(settings.api_url.clone()));
        }
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(GanttError::HttpClient)?;
        Ok(Self {
            client,
            settings,
            base_url,
        })
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GanttError::InvalidStoreUrl(self.settings.api_url.clone()))?
            .pop_if_empty()
            .extend(["v0", self.settings.base_id.as_str(), table]);
        Ok(url)
    }
}

impl RecordStore for AirtableStore {
    async fn list_page(&self, table: &str, offset: Option<&str>) -> Result<Page> {
        let url = self.table_url(table)?;
        let page_size = PAGE_SIZE.to_string();
        let mut req = self
            .client
            .get(url)
            .bearer_auth(&self.settings.token)
            .query(&[("pageSize", page_size.as_str())]);
        if let Some(offset) = offset {
            req = req.query(&[("offset", offset)]);
        }

        let response = req.send().await.map_err(|source| GanttError::Request {
            table: table.to_string(),
            source,
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| GanttError::Request {
            table: table.to_string(),
            source,
        })?;

        if is_missing_table(status, &body) {
            return Err(GanttError::TableNotFound(table.to_string()));
        }
        if !status.is_success() {
            return Err(GanttError::Upstream {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| GanttError::Decode {
            table: table.to_string(),
            source,
        })
    }
}

/// Airtable answers 404 for unknown tables, or 403 with a
/// `..._MODEL_NOT_FOUND` code when the token cannot tell the difference.
fn is_missing_table(status: StatusCode, body: &str) -> bool {
    status == StatusCode::NOT_FOUND
        || (status == StatusCode::FORBIDDEN && body.contains("MODEL_NOT_FOUND"))
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store serving fixed tables in pages of `page_size`. Tables not
/// registered report `TableNotFound`; tables marked failing report a 500.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    tables: std::collections::HashMap<String, Vec<RawRecord>>,
    failing: Vec<String>,
    page_size: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            tables: std::collections::HashMap::new(),
            failing: Vec::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn with_table(mut self, name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.tables.insert(name.into(), records);
        self
    }

    pub fn with_failing_table(mut self, name: impl Into<String>) -> Self {
        self.failing.push(name.into());
        self
    }
}

#[cfg(test)]
impl RecordStore for MemoryStore {
    async fn list_page(&self, table: &str, offset: Option<&str>) -> Result<Page> {
        if self.failing.iter().any(|t| t == table) {
            return Err(GanttError::Upstream {
                table: table.to_string(),
                status: 500,
                body: "simulated failure".to_string(),
            });
        }
        let records = self
            .tables
            .get(table)
            .ok_or_else(|| GanttError::TableNotFound(table.to_string()))?;

        let start = match offset {
            Some(o) => o.parse::<usize>().map_err(|_| GanttError::Upstream {
                table: table.to_string(),
                status: 422,
                body: format!("LIST_RECORDS_ITERATOR_NOT_AVAILABLE: {o}"),
            })?,
            None => 0,
        };
        let end = (start + self.page_size).min(records.len());
        let next = (end < records.len()).then(|| end.to_string());
        Ok(Page {
            records: records.get(start..end).unwrap_or_default().to_vec(),
            offset: next,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
