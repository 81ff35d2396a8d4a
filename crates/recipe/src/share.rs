use mealdeck_shared::recipe::Recipe;
use serde::Serialize;

/// Shown when the browser has no native share capability.
pub const SHARE_UNSUPPORTED: &str = "Sharing not supported on this browser.";

/// Payload handed to the platform share sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareRequest {
    pub fn for_recipe(recipe: &Recipe, page_url: &str) -> Self {
        let page_url = page_url.split('#').next().unwrap_or(page_url);

        Self {
            title: recipe.name.clone(),
            text: format!("Check out this recipe: {}", recipe.name),
            url: format!("{page_url}#{}", recipe.id),
        }
    }
}
