use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post},
};
use mealdeck_mealplan::Plans;
use mealdeck_recipe::{Catalog, Library};
use mealdeck_store::SharedStore;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::template::{NotFoundTemplate, Template};

mod health;
mod index;
mod meal_plan;
mod theme;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub catalog: Arc<dyn Catalog>,
    pub store: SharedStore,
    pub library: Arc<Mutex<Library>>,
    pub plans: Arc<Mutex<Plans>>,
}

impl AppState {
    /// Hydrates favorites, ratings and meal plans from `store`.
    pub fn new(
        config: crate::config::Config,
        catalog: Arc<dyn Catalog>,
        store: SharedStore,
    ) -> Self {
        Self {
            library: Arc::new(Mutex::new(Library::hydrate(store.clone()))),
            plans: Arc::new(Mutex::new(Plans::hydrate(store.clone()))),
            config,
            catalog,
            store,
        }
    }
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    template.render_status(axum::http::StatusCode::NOT_FOUND, NotFoundTemplate)
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/", get(index::page))
        .route("/favorites/toggle", post(index::toggle_favorite))
        .route("/ratings", post(index::rate))
        .route("/planner/send", post(index::send_to_planner))
        .route("/meal-planner", get(meal_plan::page))
        .route("/meal-planner/assign", post(meal_plan::assign))
        .route("/meal-planner/unassign", post(meal_plan::unassign))
        .route("/meal-planner/print", get(meal_plan::print))
        .route("/meal-planner/export", get(meal_plan::export))
        .route("/theme", post(theme::toggle))
        .fallback(fallback)
        .nest_service("/static", crate::assets::AssetsService)
        .with_state(app_state)
}

/// Full catalog record for `id`, looked up so abbreviated listings never end
/// up persisted.
async fn resolve_recipe(
    catalog: &dyn Catalog,
    id: &str,
) -> mealdeck_shared::Result<mealdeck_shared::recipe::Recipe> {
    catalog
        .lookup(id)
        .await?
        .ok_or(mealdeck_shared::Error::NotFound)
}

/// Query flag asking the page to show the catalog failure notice.
pub const CATALOG_NOTICE: &str = "notice=catalog";

/// `target` with [`CATALOG_NOTICE`] appended, used when an action could not
/// reach the catalog.
fn with_catalog_notice(target: &str) -> String {
    let query = target.split_once('?').map(|(_, q)| q).unwrap_or_default();
    if query.split('&').any(|param| param == CATALOG_NOTICE) {
        return target.to_owned();
    }

    let separator = if target.contains('?') { '&' } else { '?' };

    format!("{target}{separator}{CATALOG_NOTICE}")
}
