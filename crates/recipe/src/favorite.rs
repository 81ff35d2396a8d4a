use mealdeck_shared::recipe::Recipe;
use serde::{Deserialize, Serialize, Serializer};

/// Favorite recipes in the order they were added, unique by id.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<Recipe>")]
pub struct Favorites(Vec<Recipe>);

impl From<Vec<Recipe>> for Favorites {
    fn from(recipes: Vec<Recipe>) -> Self {
        let mut favorites = Favorites::default();

        for recipe in recipes {
            if !favorites.contains(&recipe.id) {
                favorites.0.push(recipe);
            }
        }

        favorites
    }
}

impl Serialize for Favorites {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Favorites {
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|r| r.id == id)
    }

    /// Removes the recipe when present, appends it otherwise. Returns whether
    /// it is a favorite afterwards.
    pub fn toggle(&mut self, recipe: Recipe) -> bool {
        let before = self.0.len();
        self.0.retain(|r| r.id != recipe.id);

        if self.0.len() != before {
            return false;
        }

        self.0.push(recipe);

        true
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.0.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
