use mealdeck_shared::recipe::Recipe;

use crate::{Catalog, CatalogError, Query, ShareRequest};

pub const PAGE_SIZE: usize = 6;
pub const FETCH_FAILED: &str = "Could not reach the recipe catalog.";

/// Dismissible message shown above the catalog results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Offer to re-issue the query that failed.
    pub retry: bool,
}

impl Notice {
    pub fn fetch_failed() -> Self {
        Self {
            message: FETCH_FAILED.to_owned(),
            retry: true,
        }
    }
}

/// An issued catalog request. Only the latest ticket may update the browser.
#[derive(Debug)]
pub struct Ticket {
    seq: u64,
    pub query: Query,
    pub page: usize,
}

/// State of the catalog screen: the active query, how many pages of it are
/// visible, the expanded recipe and any pending notice.
#[derive(Debug)]
pub struct Browser {
    page_size: usize,
    query: Query,
    page: usize,
    /// Full result set of the last successful fetch.
    meals: Vec<Recipe>,
    issued: u64,
    /// Page asked for by the latest issued request.
    requested: usize,
    expanded: Option<Recipe>,
    notice: Option<Notice>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(Query::default())
    }
}

impl Browser {
    pub fn new(query: Query) -> Self {
        Self {
            page_size: PAGE_SIZE,
            query,
            page: 1,
            meals: Vec::new(),
            issued: 0,
            requested: 1,
            expanded: None,
            notice: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// The first `page * page_size` recipes of the last fetch.
    pub fn results(&self) -> &[Recipe] {
        let visible = self.page.saturating_mul(self.page_size).min(self.meals.len());

        &self.meals[..visible]
    }

    /// Size of the full result set behind the visible slice.
    pub fn available(&self) -> usize {
        self.meals.len()
    }

    pub fn has_more(&self) -> bool {
        self.results().len() < self.available()
    }

    /// Number of pages needed to show every available result.
    pub fn last_page(&self) -> usize {
        self.meals.len().div_ceil(self.page_size).max(1)
    }

    /// Shows the first `page` pages of the results already fetched, as when
    /// a listing is reopened after several "load more" steps. The page is
    /// clamped to the pages that exist.
    pub fn show_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.last_page());
    }

    pub fn expanded(&self) -> Option<&Recipe> {
        self.expanded.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn issue(&mut self) -> Ticket {
        self.issue_page(self.page)
    }

    fn issue_page(&mut self, page: usize) -> Ticket {
        self.issued += 1;
        self.requested = page;

        Ticket {
            seq: self.issued,
            query: self.query.clone(),
            page,
        }
    }

    /// Applies the outcome of `ticket`. Returns `false`, leaving the state
    /// untouched, when a newer request was issued in the meantime.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<Vec<Recipe>, CatalogError>) -> bool {
        if ticket.seq != self.issued {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued,
                "Discarding stale catalog response"
            );

            return false;
        }

        match outcome {
            Ok(meals) => {
                self.meals = meals;
                self.page = ticket.page.clamp(1, self.last_page());
                self.notice = None;
            }
            Err(err) => {
                tracing::warn!(query = ?ticket.query, err = %err, "Catalog fetch failed");

                self.notice = Some(Notice::fetch_failed());
            }
        }

        true
    }

    async fn refresh(&mut self, catalog: &dyn Catalog) -> bool {
        let ticket = self.issue();

        self.fetch(catalog, ticket).await
    }

    async fn fetch(&mut self, catalog: &dyn Catalog, ticket: Ticket) -> bool {
        let outcome = catalog.query(&ticket.query).await;

        self.resolve(ticket, outcome)
    }

    pub async fn search(&mut self, catalog: &dyn Catalog, term: &str) -> bool {
        self.query = Query::Search(term.trim().to_owned());
        self.page = 1;
        self.refresh(catalog).await
    }

    pub async fn filter_by_area(&mut self, catalog: &dyn Catalog, area: &str) -> bool {
        self.query = Query::Area(area.trim().to_owned());
        self.page = 1;
        self.refresh(catalog).await
    }

    /// Raises the visible ceiling by one page and re-fetches the same query.
    pub async fn load_more(&mut self, catalog: &dyn Catalog) -> bool {
        let ticket = self.issue_page(self.page.saturating_add(1));

        self.fetch(catalog, ticket).await
    }

    /// Re-issues the latest request, including a failed "load more".
    pub async fn retry(&mut self, catalog: &dyn Catalog) -> bool {
        let ticket = self.issue_page(self.requested);

        self.fetch(catalog, ticket).await
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn expand(&mut self, recipe: Recipe) {
        self.expanded = Some(recipe);
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn share(&self, recipe: &Recipe, page_url: &str) -> ShareRequest {
        ShareRequest::for_recipe(recipe, page_url)
    }
}
