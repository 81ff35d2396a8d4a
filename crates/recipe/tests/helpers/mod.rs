#![allow(dead_code)]

use async_trait::async_trait;
use mealdeck_recipe::{Catalog, CatalogError, CatalogResult};
use mealdeck_shared::recipe::Recipe;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Catalog serving a fixed set of recipes, with a switch to simulate outages.
#[derive(Default)]
pub struct FakeCatalog {
    pub meals: Vec<Recipe>,
    pub offline: AtomicBool,
    pub calls: AtomicUsize,
    pub last_term: Mutex<Option<String>>,
}

impl FakeCatalog {
    pub fn with_meals(count: usize) -> Self {
        let meals = (0..count)
            .map(|i| {
                let mut recipe = Recipe::new(format!("{}", 52700 + i), format!("Recipe {i}"));
                recipe.area = Some(if i % 2 == 0 { "Japanese" } else { "British" }.to_owned());
                recipe.instructions = Some("Cook.".to_owned());
                recipe
            })
            .collect();

        Self {
            meals,
            ..Default::default()
        }
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) -> CatalogResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

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
        *self.last_term.lock().unwrap() = Some(term.to_owned());

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
            .cloned()
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
