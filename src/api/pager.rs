// Pagination consumer — accumulates pages of one resource kind behind a
// loading flag.

use async_trait::async_trait;

use super::client::ApiClient;
use super::types::{Character, Episode, Location, Page, PageInfo};
use crate::error::Result;

/// Binds a record type to its collection endpoint.
#[async_trait]
pub trait PagedResource: Sized + Send {
    async fn fetch_page(client: &ApiClient, page: Option<&str>) -> Result<Page<Self>>;
}

#[async_trait]
impl PagedResource for Character {
    async fn fetch_page(client: &ApiClient, page: Option<&str>) -> Result<Page<Self>> {
        client.characters(page).await
    }
}

#[async_trait]
impl PagedResource for Location {
    async fn fetch_page(client: &ApiClient, page: Option<&str>) -> Result<Page<Self>> {
        client.locations(page).await
    }
}

#[async_trait]
impl PagedResource for Episode {
    async fn fetch_page(client: &ApiClient, page: Option<&str>) -> Result<Page<Self>> {
        client.episodes(page).await
    }
}

/// Holds a growing ordered sequence of decoded records, the last-seen
/// cursor, and a loading flag that clears on every terminal outcome.
pub struct Pager<T> {
    client: ApiClient,
    items: Vec<T>,
    info: Option<PageInfo>,
    loading: bool,
}

impl<T: PagedResource> Pager<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            info: None,
            loading: false,
        }
    }

    /// Fetch the canonical first page (`page: None`) or an exact cursor URL.
    /// A first-page load replaces the sequence, but only once the new page
    /// has actually arrived; a cursor load appends. Failures are surfaced to
    /// the caller and leave the accumulated items intact.
    pub async fn load(&mut self, page: Option<&str>) -> Result<()> {
        self.loading = true;
        let fetched = T::fetch_page(&self.client, page).await;
        self.loading = false;

        let result = fetched?;
        if page.is_none() {
            self.items.clear();
        }
        self.items.extend(result.results);
        self.info = Some(result.info);
        Ok(())
    }

    /// Follow the `next` cursor if one exists. Returns whether another page
    /// was fetched.
    pub async fn load_next(&mut self) -> Result<bool> {
        let next = self.info.as_ref().and_then(|info| info.next.clone());
        match next {
            Some(url) => {
                self.load(Some(&url)).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn info(&self) -> Option<&PageInfo> {
        self.info.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
