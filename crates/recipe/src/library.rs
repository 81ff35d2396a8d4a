use mealdeck_shared::{Result, recipe::Recipe};
use mealdeck_store::{FAVORITES, RATINGS, SharedStore};

use crate::{Favorites, Ratings, Stars};

/// The user's favorites and ratings, backed by the store.
///
/// Every mutation writes the whole value for its key before the in-memory
/// copy changes, so a failed write leaves both sides as they were.
pub struct Library {
    store: SharedStore,
    favorites: Favorites,
    ratings: Ratings,
}

impl Library {
    pub fn hydrate(store: SharedStore) -> Self {
        let favorites = mealdeck_store::load(store.as_ref(), FAVORITES);
        let ratings = mealdeck_store::load(store.as_ref(), RATINGS);

        Self {
            store,
            favorites,
            ratings,
        }
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn ratings(&self) -> &Ratings {
        &self.ratings
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn rating(&self, id: &str) -> Option<Stars> {
        self.ratings.get(id)
    }

    #[tracing::instrument(skip_all, fields(id = %recipe.id))]
    pub fn toggle_favorite(&mut self, recipe: Recipe) -> Result<bool> {
        let mut favorites = self.favorites.clone();
        let now = favorites.toggle(recipe);

        mealdeck_store::save(self.store.as_ref(), FAVORITES, &favorites)?;
        self.favorites = favorites;

        tracing::debug!(favorite = now, "Favorite toggled");

        Ok(now)
    }

    #[tracing::instrument(skip(self))]
    pub fn rate(&mut self, id: &str, stars: u8) -> Result<Stars> {
        let stars = Stars::new(stars)?;
        let mut ratings = self.ratings.clone();
        ratings.rate(id, stars);

        mealdeck_store::save(self.store.as_ref(), RATINGS, &ratings)?;
        self.ratings = ratings;

        Ok(stars)
    }
}
