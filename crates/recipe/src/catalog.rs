//! Client for the TheMealDB v1 JSON API.

use async_trait::async_trait;
use mealdeck_shared::recipe::Recipe;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use url::Url;

use crate::{CatalogError, CatalogResult};

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1/";
const USER_AGENT: &str = concat!("mealdeck/", env!("CARGO_PKG_VERSION"));

/// Which listing the catalog screen shows. The two modes never combine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Free-text search by name; an empty term lists everything.
    Search(String),
    /// Recipes from one region.
    Area(String),
}

impl Default for Query {
    fn default() -> Self {
        Query::Search(String::new())
    }
}

/// Read-only recipe catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, term: &str) -> CatalogResult<Vec<Recipe>>;

    async fn filter_by_area(&self, area: &str) -> CatalogResult<Vec<Recipe>>;

    async fn areas(&self) -> CatalogResult<Vec<String>>;

    async fn lookup(&self, id: &str) -> CatalogResult<Option<Recipe>>;

    async fn query(&self, query: &Query) -> CatalogResult<Vec<Recipe>> {
        match query {
            Query::Search(term) => self.search(term).await,
            Query::Area(area) => self.filter_by_area(area).await,
        }
    }
}

/// Returns the full record for `recipe`, looking it up when the catalog only
/// handed back an abbreviated one.
pub async fn complete(catalog: &dyn Catalog, recipe: Recipe) -> CatalogResult<Recipe> {
    if recipe.is_complete() {
        return Ok(recipe);
    }

    Ok(catalog.lookup(&recipe.id).await?.unwrap_or(recipe))
}

#[derive(Deserialize)]
struct Envelope<T> {
    meals: Option<Vec<T>>,
}

#[derive(Deserialize)]
struct AreaRecord {
    #[serde(rename = "strArea")]
    area: String,
}

pub struct MealDb {
    client: reqwest::Client,
    base: Url,
}

impl MealDb {
    pub fn new(base_url: &str, timeout: Duration) -> CatalogResult<Self> {
        let mut base_url = base_url.trim().to_owned();

        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base: Url::parse(&base_url)?,
        })
    }

    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> CatalogResult<Url> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut().extend_pairs(params);

        Ok(url)
    }

    async fn meals<T: DeserializeOwned>(&self, url: Url) -> CatalogResult<Vec<T>> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Catalog request failed");

            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;

        Ok(envelope.meals.unwrap_or_default())
    }
}

#[async_trait]
impl Catalog for MealDb {
    #[tracing::instrument(skip(self))]
    async fn search(&self, term: &str) -> CatalogResult<Vec<Recipe>> {
        self.meals(self.endpoint("search.php", &[("s", term)])?)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn filter_by_area(&self, area: &str) -> CatalogResult<Vec<Recipe>> {
        self.meals(self.endpoint("filter.php", &[("a", area)])?)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn areas(&self) -> CatalogResult<Vec<String>> {
        let records: Vec<AreaRecord> = self
            .meals(self.endpoint("list.php", &[("a", "list")])?)
            .await?;

        Ok(records.into_iter().map(|r| r.area).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn lookup(&self, id: &str) -> CatalogResult<Option<Recipe>> {
        let meals: Vec<Recipe> = self
            .meals(self.endpoint("lookup.php", &[("i", id)])?)
            .await?;

        Ok(meals.into_iter().next())
    }
}
