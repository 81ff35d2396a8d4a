use std::str::FromStr;

use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect},
};
use mealdeck_recipe::{Browser, Notice, SHARE_UNSUPPORTED, ShareRequest, Stars, complete};
use mealdeck_shared::{
    mealplan::{Slot, iso_date, parse_date, today},
    recipe::Recipe,
};
use serde::Deserialize;
use strum::VariantArray;

use crate::{
    routes::{AppState, resolve_recipe, with_catalog_notice},
    template::{Template, safe_return_to},
};

pub struct StarView {
    pub value: u8,
    pub filled: bool,
}

pub struct CardView {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub area: Option<String>,
    pub category: Option<String>,
    pub favorite: bool,
    pub stars: Vec<StarView>,
    pub share: ShareRequest,
    pub expand_url: String,
}

pub struct DetailView {
    pub name: String,
    pub thumbnail: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub close_url: String,
}

impl DetailView {
    pub fn new(recipe: &Recipe, close_url: String) -> Self {
        Self {
            name: recipe.name.clone(),
            thumbnail: recipe.thumbnail.clone(),
            ingredients: recipe.ingredients().collect(),
            instructions: recipe
                .instructions
                .as_deref()
                .unwrap_or_default()
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect(),
            close_url,
        }
    }
}

pub struct AreaOption {
    pub name: String,
    pub selected: bool,
}

pub struct SlotOption {
    pub value: String,
    pub title: &'static str,
}

pub fn slot_options() -> Vec<SlotOption> {
    Slot::VARIANTS
        .iter()
        .map(|slot| SlotOption {
            value: slot.to_string(),
            title: slot.title(),
        })
        .collect()
}

#[derive(askama::Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_path: String,
    pub current_url: String,
    pub dark: bool,
    pub term: String,
    pub areas: Vec<AreaOption>,
    pub favorites_view: bool,
    pub cards: Vec<CardView>,
    pub more_url: Option<String>,
    pub retry_url: String,
    pub dismiss_url: String,
    pub notice: Option<Notice>,
    pub detail: Option<DetailView>,
    pub today: String,
    pub slots: Vec<SlotOption>,
    pub share_unsupported: &'static str,
}

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub q: Option<String>,
    pub area: Option<String>,
    pub page: Option<usize>,
    pub favorites: Option<String>,
    pub expand: Option<String>,
    pub notice: Option<String>,
    pub dismiss: Option<String>,
}

impl PageQuery {
    fn is_favorites_view(&self) -> bool {
        self.favorites.as_deref() == Some("1")
    }

    fn is_dismissed(&self) -> bool {
        self.dismiss.as_deref() == Some("1")
    }

    /// A non-empty area filters by cuisine. Otherwise the term is searched,
    /// an empty area ("All cuisines") meaning every recipe.
    fn listing_query(&self, default_query: &str) -> mealdeck_recipe::Query {
        match self.area.as_deref().map(str::trim) {
            Some(area) if !area.is_empty() => mealdeck_recipe::Query::Area(area.to_owned()),
            Some(_) => mealdeck_recipe::Query::Search(
                self.q.as_deref().unwrap_or_default().trim().to_owned(),
            ),
            None => mealdeck_recipe::Query::Search(
                self.q.as_deref().unwrap_or(default_query).trim().to_owned(),
            ),
        }
    }

    fn dismiss_url(&self, page: usize) -> String {
        let url = self.url(page, self.expand.as_deref());
        let separator = if url.contains('?') { '&' } else { '?' };

        format!("{url}{separator}dismiss=1")
    }

    /// Link to this listing with other parameters replaced.
    fn url(&self, page: usize, expand: Option<&str>) -> String {
        let mut params = Vec::new();

        if self.is_favorites_view() {
            params.push("favorites=1".to_owned());
        } else if let Some(area) = self.area.as_deref().filter(|a| !a.trim().is_empty()) {
            params.push(format!("area={}", urlencoding::encode(area.trim())));
        } else if let Some(q) = self.q.as_deref().or(self.area.as_ref().map(|_| "")) {
            params.push(format!("q={}", urlencoding::encode(q.trim())));
        }

        if page > 1 {
            params.push(format!("page={page}"));
        }

        if let Some(id) = expand {
            params.push(format!("expand={}", urlencoding::encode(id)));
        }

        if params.is_empty() {
            return "/".to_owned();
        }

        format!("/?{}", params.join("&"))
    }
}

#[tracing::instrument(skip_all, fields(q = ?input.q, area = ?input.area, page = ?input.page))]
pub async fn page(
    template: Template,
    State(app): State<AppState>,
    Query(input): Query<PageQuery>,
) -> impl IntoResponse {
    let catalog = app.catalog.as_ref();
    let mut browser = Browser::default().with_page_size(app.config.catalog.page_size);

    let recipes: Vec<Recipe> = if input.is_favorites_view() {
        app.library.lock().await.favorites().iter().cloned().collect()
    } else {
        match input.listing_query(&app.config.catalog.default_query) {
            mealdeck_recipe::Query::Area(area) => browser.filter_by_area(catalog, &area).await,
            mealdeck_recipe::Query::Search(term) => browser.search(catalog, &term).await,
        };

        browser.show_page(input.page.unwrap_or(1));
        browser.results().to_vec()
    };
    let page = browser.page();

    if let Some(id) = input.expand.as_deref() {
        let expanded = match recipes.iter().find(|r| r.id == id) {
            Some(recipe) => complete(catalog, recipe.clone())
                .await
                .map_err(mealdeck_shared::Error::from),
            _ => resolve_recipe(catalog, id).await,
        };

        match expanded {
            Ok(recipe) => browser.expand(recipe),
            Err(err) => tracing::warn!(id, err = %err, "Failed to load recipe detail"),
        }
    }

    if input.is_dismissed() {
        browser.dismiss_notice();
    }
    let notice = browser
        .notice()
        .cloned()
        .or_else(|| (input.notice.as_deref() == Some("catalog")).then(Notice::fetch_failed));

    let areas = match catalog.areas().await {
        Ok(areas) => areas,
        Err(err) => {
            tracing::warn!(err = %err, "Failed to load areas");
            vec![]
        }
    };
    let selected_area = input.area.as_deref().map(str::trim).unwrap_or_default();

    let page_url = format!("{}/", app.config.public_url());
    let cards = {
        let library = app.library.lock().await;

        recipes
            .iter()
            .map(|recipe| {
                let rating = library.rating(&recipe.id).map(Stars::get).unwrap_or_default();

                CardView {
                    id: recipe.id.clone(),
                    name: recipe.name.clone(),
                    thumbnail: recipe.thumbnail.clone(),
                    area: recipe.area.clone(),
                    category: recipe.category.clone(),
                    favorite: library.is_favorite(&recipe.id),
                    stars: (mealdeck_recipe::MIN_STARS..=mealdeck_recipe::MAX_STARS)
                        .map(|value| StarView {
                            value,
                            filled: value <= rating,
                        })
                        .collect(),
                    share: browser.share(recipe, &page_url),
                    expand_url: input.url(page, Some(&recipe.id)),
                }
            })
            .collect()
    };

    let more_url = (!input.is_favorites_view() && browser.has_more())
        .then(|| input.url(page.saturating_add(1), None));

    template
        .render(IndexTemplate {
            current_path: template.current_path.clone(),
            current_url: template.current_url.clone(),
            dark: template.dark,
            term: match browser.query() {
                mealdeck_recipe::Query::Search(term) => term.clone(),
                _ => String::new(),
            },
            areas: areas
                .into_iter()
                .map(|name| AreaOption {
                    selected: name == selected_area,
                    name,
                })
                .collect(),
            favorites_view: input.is_favorites_view(),
            cards,
            more_url,
            retry_url: input.url(page, input.expand.as_deref()),
            dismiss_url: input.dismiss_url(page),
            notice,
            detail: browser
                .expanded()
                .map(|recipe| DetailView::new(recipe, input.url(page, None))),
            today: iso_date(today()),
            slots: slot_options(),
            share_unsupported: SHARE_UNSUPPORTED,
        })
        .into_response()
}

#[derive(Deserialize)]
pub struct FavoriteInput {
    pub id: String,
    pub return_to: Option<String>,
}

#[tracing::instrument(skip_all, fields(id = %input.id))]
pub async fn toggle_favorite(
    template: Template,
    State(app): State<AppState>,
    Form(input): Form<FavoriteInput>,
) -> impl IntoResponse {
    let existing = app.library.lock().await.favorites().get(&input.id).cloned();
    let recipe = match existing {
        Some(recipe) => recipe,
        _ => match resolve_recipe(app.catalog.as_ref(), &input.id).await {
            Err(mealdeck_shared::Error::Catalog(err)) => {
                tracing::warn!(err = %err, "Catalog unreachable, favorite not toggled");

                return Redirect::to(&with_catalog_notice(safe_return_to(
                    input.return_to.as_deref(),
                )))
                .into_response();
            }
            result => crate::try_page_response!(sync: result, template),
        },
    };

    crate::try_page_response!(
        sync: app.library.lock().await.toggle_favorite(recipe),
        template
    );

    Redirect::to(safe_return_to(input.return_to.as_deref())).into_response()
}

#[derive(Deserialize)]
pub struct RateInput {
    pub id: String,
    pub stars: u8,
    pub return_to: Option<String>,
}

#[tracing::instrument(skip_all, fields(id = %input.id))]
pub async fn rate(
    template: Template,
    State(app): State<AppState>,
    Form(input): Form<RateInput>,
) -> impl IntoResponse {
    crate::try_page_response!(
        sync: app.library.lock().await.rate(&input.id, input.stars),
        template
    );

    Redirect::to(safe_return_to(input.return_to.as_deref())).into_response()
}

#[derive(Deserialize)]
pub struct SendInput {
    pub id: String,
    pub date: String,
    pub slot: String,
    pub return_to: Option<String>,
}

#[tracing::instrument(skip_all, fields(id = %input.id))]
pub async fn send_to_planner(
    template: Template,
    State(app): State<AppState>,
    Form(input): Form<SendInput>,
) -> impl IntoResponse {
    let date = crate::try_page_response!(sync: parse_date(&input.date), template);
    let slot = crate::try_page_response!(sync: parse_slot(&input.slot), template);
    let recipe = match resolve_recipe(app.catalog.as_ref(), &input.id).await {
        Err(mealdeck_shared::Error::Catalog(err)) => {
            tracing::warn!(err = %err, "Catalog unreachable, recipe not sent");

            return Redirect::to(&with_catalog_notice(safe_return_to(
                input.return_to.as_deref(),
            )))
            .into_response();
        }
        result => crate::try_page_response!(sync: result, template),
    };

    let (week, day) = crate::try_page_response!(
        sync: app.plans.lock().await.send(date, slot, recipe),
        template
    );

    tracing::info!(%week, %day, %slot, "Recipe sent to planner");

    Redirect::to(safe_return_to(input.return_to.as_deref())).into_response()
}

pub fn parse_slot(value: &str) -> mealdeck_shared::Result<Slot> {
    Slot::from_str(value.trim())
        .map_err(|_| mealdeck_shared::Error::Validate(format!("unknown meal slot: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_urls() {
        let search = PageQuery {
            q: Some("mac & cheese".to_owned()),
            ..Default::default()
        };
        assert_eq!(search.url(1, None), "/?q=mac%20%26%20cheese");
        assert_eq!(search.url(3, Some("52772")), "/?q=mac%20%26%20cheese&page=3&expand=52772");

        let area = PageQuery {
            q: Some("ignored".to_owned()),
            area: Some("Japanese".to_owned()),
            ..Default::default()
        };
        assert_eq!(area.url(2, None), "/?area=Japanese&page=2");

        let favorites = PageQuery {
            favorites: Some("1".to_owned()),
            ..Default::default()
        };
        assert_eq!(favorites.url(1, None), "/?favorites=1");
        assert_eq!(PageQuery::default().url(1, None), "/");
    }

    #[test]
    fn test_empty_area_searches_everything() {
        let all = PageQuery {
            area: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            all.listing_query("chicken"),
            mealdeck_recipe::Query::Search(String::new())
        );
        assert_eq!(all.url(2, None), "/?q=&page=2");

        assert_eq!(
            PageQuery::default().listing_query("chicken"),
            mealdeck_recipe::Query::Search("chicken".to_owned())
        );
        assert_eq!(PageQuery::default().dismiss_url(1), "/?dismiss=1");
    }

    #[test]
    fn test_parse_slot() {
        assert_eq!(parse_slot("dinner").unwrap(), Slot::Dinner);
        assert!(matches!(
            parse_slot("brunch"),
            Err(mealdeck_shared::Error::Validate(_))
        ));
    }
}
