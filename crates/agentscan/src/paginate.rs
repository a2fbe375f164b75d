use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use crate::errors::PageError;

/// Stable identity key used to deduplicate items across pages. The backing
/// dataset can shift between requests, so the same entity may legitimately
/// reappear on a later page.
pub trait PageItem {
    fn identity(&self) -> &str;
}

/// One fetched page. `next_cursor` of `None` means the list is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Filter parameters for a listing. Changing these requires a `reset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub chain: Option<String>,
    pub agent_id: Option<String>,
}

impl ListFilter {
    pub fn chain<S: Into<String>>(chain: S) -> Self {
        Self {
            chain: Some(chain.into()),
            ..Self::default()
        }
    }

    pub fn agent<S: Into<String>>(agent_id: S) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            ..Self::default()
        }
    }
}

/// Everything a source needs to fetch one page.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Opaque server-issued token; absent for the first page.
    pub cursor: Option<String>,
    pub chain: Option<String>,
    pub agent_id: Option<String>,
    /// Identity keys the caller already holds, for endpoints that accept
    /// them as a comma-joined `excludedIds` parameter.
    pub excluded_ids: Vec<String>,
}

/// A cursor-paginated remote endpoint.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: PageItem + Send;

    async fn fetch(&self, request: &PageRequest) -> Result<Page<Self::Item>, PageError>;
}

/// What a load attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched; the count is how many items survived dedup.
    Loaded(usize),
    /// Guards stopped the fetch: already loading, not started, or exhausted.
    Skipped,
}

/// Accumulates pages from a `PageSource` into a deduplicated item list.
///
/// `reset` fetches the first page; `load_more` is the scroll-proximity
/// trigger and only fires while a cursor exists and nothing is in flight.
/// The loading flag is both the state exposed to the view and the in-flight
/// guard; fetch failures leave the accumulated state untouched.
pub struct CursorPaginator<S: PageSource> {
    source: S,
    filter: ListFilter,
    items: Vec<S::Item>,
    seen: HashSet<String>,
    cursor: Option<String>,
    loading: bool,
    started: bool,
    exclude_seen: bool,
    debounce: Option<Duration>,
}

impl<S: PageSource> CursorPaginator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            filter: ListFilter::default(),
            items: Vec::new(),
            seen: HashSet::new(),
            cursor: None,
            loading: false,
            started: false,
            exclude_seen: false,
            debounce: None,
        }
    }

    /// Send the identity keys of held items as `excludedIds` on every fetch.
    pub fn with_exclude_seen(mut self) -> Self {
        self.exclude_seen = true;
        self
    }

    /// Delay `load_more` by a fixed interval. The fetch starts only once the
    /// wait completes, so dropping the future during it makes no request.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the initial page resolved and a further cursor exists.
    pub fn has_more(&self) -> bool {
        self.started && self.cursor.is_some()
    }

    /// Discard everything and fetch the first page for the given filter.
    pub async fn reset(&mut self, filter: ListFilter) -> Result<LoadOutcome, PageError> {
        self.filter = filter;
        self.items.clear();
        self.seen.clear();
        self.cursor = None;
        self.started = false;
        self.load_page(None).await
    }

    /// Fetch the next page if one exists and nothing is in flight.
    pub async fn load_more(&mut self) -> Result<LoadOutcome, PageError> {
        if !self.has_more() || self.loading {
            return Ok(LoadOutcome::Skipped);
        }
        // The exclusive borrow keeps the guards stable across the wait, and
        // nothing is marked in flight until the fetch actually starts.
        if let Some(debounce) = self.debounce {
            tokio::time::sleep(debounce).await;
        }
        self.load_page(self.cursor.clone()).await
    }

    async fn load_page(&mut self, cursor: Option<String>) -> Result<LoadOutcome, PageError> {
        if self.loading {
            return Ok(LoadOutcome::Skipped);
        }
        self.loading = true;

        let request = PageRequest {
            cursor,
            chain: self.filter.chain.clone(),
            agent_id: self.filter.agent_id.clone(),
            excluded_ids: if self.exclude_seen {
                self.items
                    .iter()
                    .map(|item| item.identity().to_string())
                    .collect()
            } else {
                Vec::new()
            },
        };

        let result = self.source.fetch(&request).await;
        self.loading = false;

        let page = result?;
        Ok(LoadOutcome::Loaded(self.merge(page)))
    }

    fn merge(&mut self, page: Page<S::Item>) -> usize {
        let mut added = 0;
        for item in page.items {
            if self.seen.insert(item.identity().to_string()) {
                self.items.push(item);
                added += 1;
            }
        }
        self.cursor = page.next_cursor;
        self.started = true;
        added
    }
}
