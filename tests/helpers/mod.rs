#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use mealdeck::{AppState, config::Config};
use mealdeck_recipe::{Catalog, CatalogError, CatalogResult};
use mealdeck_shared::recipe::Recipe;
use mealdeck_store::{KeyValueStore, MemoryStore};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tower::ServiceExt;

pub const TERIYAKI_ID: &str = "52772";

/// Catalog serving a fixed set of recipes, with a switch to simulate outages.
#[derive(Default)]
pub struct FakeCatalog {
    pub meals: Vec<Recipe>,
    pub offline: AtomicBool,
}

impl FakeCatalog {
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn hit(&self) -> CatalogResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Status(503));
        }

        Ok(())
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, term: &str) -> CatalogResult<Vec<Recipe>> {
        self.hit()?;
        let term = term.to_lowercase();

        Ok(self
            .meals
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&term))
            .cloned()
            .collect())
    }

    async fn filter_by_area(&self, area: &str) -> CatalogResult<Vec<Recipe>> {
        self.hit()?;

        Ok(self
            .meals
            .iter()
            .filter(|r| r.area.as_deref() == Some(area))
            .map(|r| {
                let mut abbreviated = Recipe::new(r.id.clone(), r.name.clone());
                abbreviated.thumbnail = r.thumbnail.clone();
                abbreviated
            })
            .collect())
    }

    async fn areas(&self) -> CatalogResult<Vec<String>> {
        self.hit()?;

        Ok(vec!["British".to_owned(), "Japanese".to_owned()])
    }

    async fn lookup(&self, id: &str) -> CatalogResult<Option<Recipe>> {
        self.hit()?;

        Ok(self.meals.iter().find(|r| r.id == id).cloned())
    }
}

pub fn teriyaki() -> Recipe {
    let mut recipe = Recipe::new(TERIYAKI_ID, "Teriyaki Chicken Casserole");
    recipe.area = Some("Japanese".to_owned());
    recipe.category = Some("Chicken".to_owned());
    recipe.instructions = Some("Preheat oven to 350 F.\r\nBake for 35 minutes.".to_owned());
    recipe.lines[0].ingredient = Some("soy sauce".to_owned());
    recipe.lines[0].measure = Some("3/4 cup".to_owned());
    recipe.lines[1].ingredient = Some("water".to_owned());
    recipe.lines[1].measure = Some("1/2 cup".to_owned());
    recipe
}

pub struct TestState {
    pub router: Router,
    pub catalog: Arc<FakeCatalog>,
    pub store: Arc<MemoryStore>,
}

/// App wired to an in-memory store and a catalog holding eight plain
/// recipes plus the teriyaki casserole.
pub fn setup_test_state() -> TestState {
    setup_test_state_with(MemoryStore::default())
}

pub fn setup_test_state_with(store: MemoryStore) -> TestState {
    let mut meals: Vec<Recipe> = (0..8)
        .map(|i| {
            let mut recipe = Recipe::new(format!("{}", 52700 + i), format!("Recipe {i}"));
            recipe.area = Some(if i % 2 == 0 { "Japanese" } else { "British" }.to_owned());
            recipe.instructions = Some("Cook.".to_owned());
            recipe
        })
        .collect();
    meals.push(teriyaki());

    let catalog = Arc::new(FakeCatalog {
        meals,
        ..Default::default()
    });
    let store = Arc::new(store);
    let state = AppState::new(Config::default(), catalog.clone(), store.clone());

    TestState {
        router: mealdeck::router(state),
        catalog,
        store,
    }
}

impl TestState {
    pub async fn get(&self, uri: &str) -> anyhow::Result<Response<Body>> {
        let request = Request::builder().uri(uri).body(Body::empty())?;

        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> anyhow::Result<Response<Body>> {
        let request = Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())?;

        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn post(&self, uri: &str, form: &[(&str, &str)]) -> anyhow::Result<Response<Body>> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(form)?))?;

        Ok(self.router.clone().oneshot(request).await?)
    }

    pub fn stored(&self, key: &str) -> anyhow::Result<serde_json::Value> {
        let raw = self.store.get(key)?.unwrap_or_else(|| "null".to_owned());

        Ok(serde_json::from_str(&raw)?)
    }
}

pub async fn body_text(response: Response<Body>) -> anyhow::Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
