use std::str::FromStr;

use axum::{
    extract::{Form, Query, State},
    http::header,
    response::{IntoResponse, Redirect},
};
use mealdeck_mealplan::{Planner, WeekDocument, pdf};
use mealdeck_recipe::Notice;
use mealdeck_shared::{
    mealplan::{Day, WeekKey, parse_date},
    recipe::Recipe,
};
use serde::Deserialize;

use crate::{
    routes::{
        AppState,
        index::{DetailView, parse_slot},
        resolve_recipe, with_catalog_notice,
    },
    template::Template,
};

pub struct PlannedView {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub view_url: String,
}

pub struct CellView {
    pub slot: String,
    pub title: &'static str,
    pub emoji: &'static str,
    pub recipes: Vec<PlannedView>,
    pub pick_url: String,
}

pub struct ColumnView {
    pub day: String,
    pub label: String,
    pub cells: Vec<CellView>,
}

pub struct CandidateView {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
}

/// Recipe chooser for one empty or partly filled cell.
pub struct PickerView {
    pub day: String,
    pub slot: String,
    pub slot_title: &'static str,
    pub term: String,
    pub candidates: Vec<CandidateView>,
    pub notice: Option<Notice>,
    pub close_url: String,
}

#[derive(askama::Template)]
#[template(path = "meal_planner.html")]
pub struct MealPlannerTemplate {
    pub current_path: String,
    pub current_url: String,
    pub dark: bool,
    pub week: String,
    pub range: String,
    pub previous_url: String,
    pub next_url: String,
    pub print_url: String,
    pub export_url: String,
    pub columns: Vec<ColumnView>,
    pub detail: Option<DetailView>,
    pub picker: Option<PickerView>,
    pub notice: Option<Notice>,
    pub dismiss_url: String,
}

#[derive(askama::Template)]
#[template(path = "print.html")]
pub struct PrintTemplate {
    pub document: WeekDocument,
    pub back_url: String,
}

#[derive(Deserialize, Default)]
pub struct WeekQuery {
    pub week: Option<String>,
    pub view: Option<String>,
    pub pick_day: Option<String>,
    pub pick_slot: Option<String>,
    pub q: Option<String>,
    pub notice: Option<String>,
}

fn week_url(week: WeekKey) -> String {
    format!("/meal-planner?week={week}")
}

/// Planner showing the week containing `week`, or the current week.
fn planner_for(week: Option<&str>) -> mealdeck_shared::Result<Planner> {
    let mut planner = Planner::default();

    if let Some(value) = week.map(str::trim).filter(|v| !v.is_empty()) {
        planner.set_week(parse_date(value)?);
    }

    Ok(planner)
}

pub fn parse_day(value: &str) -> mealdeck_shared::Result<Day> {
    Day::from_str(value.trim())
        .map_err(|_| mealdeck_shared::Error::Validate(format!("unknown day: {value}")))
}

#[tracing::instrument(skip_all, fields(week = ?input.week))]
pub async fn page(
    template: Template,
    State(app): State<AppState>,
    Query(input): Query<WeekQuery>,
) -> impl IntoResponse {
    let mut planner = crate::try_page_response!(sync: planner_for(input.week.as_deref()), template);
    let week = planner.week();
    let grid = planner.grid(&app.plans.lock().await.week(week));

    if let Some(id) = input.view.as_deref() {
        let found = grid
            .iter()
            .flat_map(|column| column.cells.iter())
            .flat_map(|cell| cell.recipes.iter())
            .find(|recipe| recipe.id == id)
            .cloned();

        match found {
            Some(recipe) => planner.view_detail(recipe),
            _ => tracing::debug!(id, "Recipe not planned this week"),
        }
    }

    let picker = match (input.pick_day.as_deref(), input.pick_slot.as_deref()) {
        (Some(day), Some(slot)) => {
            let day = crate::try_page_response!(sync: parse_day(day), template);
            let slot = crate::try_page_response!(sync: parse_slot(slot), template);
            let term = input.q.as_deref().unwrap_or_default().trim().to_owned();

            let (candidates, notice) = match app.catalog.search(&term).await {
                Ok(recipes) => (recipes, None),
                Err(err) => {
                    tracing::warn!(err = %err, "Failed to load picker candidates");
                    (vec![], Some(Notice::fetch_failed()))
                }
            };

            Some(PickerView {
                day: day.to_string(),
                slot: slot.to_string(),
                slot_title: slot.title(),
                term,
                candidates: candidates
                    .into_iter()
                    .map(|recipe| CandidateView {
                        id: recipe.id,
                        name: recipe.name,
                        thumbnail: recipe.thumbnail,
                    })
                    .collect(),
                notice,
                close_url: week_url(week),
            })
        }
        _ => None,
    };

    let columns = grid
        .into_iter()
        .map(|column| ColumnView {
            day: column.day.to_string(),
            label: column.label,
            cells: column
                .cells
                .into_iter()
                .map(|cell| CellView {
                    slot: cell.slot.to_string(),
                    title: cell.slot.title(),
                    emoji: cell.slot.emoji(),
                    pick_url: format!(
                        "{}&pick_day={}&pick_slot={}",
                        week_url(week),
                        column.day,
                        cell.slot
                    ),
                    recipes: cell
                        .recipes
                        .into_iter()
                        .map(|recipe| PlannedView {
                            view_url: format!(
                                "{}&view={}",
                                week_url(week),
                                urlencoding::encode(&recipe.id)
                            ),
                            id: recipe.id,
                            name: recipe.name,
                            thumbnail: recipe.thumbnail,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    template
        .render(MealPlannerTemplate {
            current_path: template.current_path.clone(),
            current_url: template.current_url.clone(),
            dark: template.dark,
            week: week.to_string(),
            range: week.range_label(),
            previous_url: week_url(week.previous()),
            next_url: week_url(week.next()),
            print_url: format!("/meal-planner/print?week={week}"),
            export_url: format!("/meal-planner/export?week={week}"),
            columns,
            detail: planner
                .detail()
                .map(|recipe| DetailView::new(recipe, week_url(week))),
            picker,
            notice: (input.notice.as_deref() == Some("catalog")).then(Notice::fetch_failed),
            dismiss_url: week_url(week),
        })
        .into_response()
}

#[derive(Deserialize)]
pub struct CellInput {
    pub week: String,
    pub day: String,
    pub slot: String,
    pub id: String,
}

#[tracing::instrument(skip_all, fields(week = %input.week, day = %input.day, slot = %input.slot, id = %input.id))]
pub async fn assign(
    template: Template,
    State(app): State<AppState>,
    Form(input): Form<CellInput>,
) -> impl IntoResponse {
    let planner = crate::try_page_response!(sync: planner_for(Some(&input.week)), template);
    let day = crate::try_page_response!(sync: parse_day(&input.day), template);
    let slot = crate::try_page_response!(sync: parse_slot(&input.slot), template);
    let recipe: Recipe = match resolve_recipe(app.catalog.as_ref(), &input.id).await {
        Err(mealdeck_shared::Error::Catalog(err)) => {
            tracing::warn!(err = %err, "Catalog unreachable, recipe not assigned");

            return Redirect::to(&with_catalog_notice(&week_url(planner.week()))).into_response();
        }
        result => crate::try_page_response!(sync: result, template),
    };

    crate::try_page_response!(
        sync: planner.assign(&mut *app.plans.lock().await, day, slot, recipe),
        template
    );

    Redirect::to(&week_url(planner.week())).into_response()
}

#[tracing::instrument(skip_all, fields(week = %input.week, day = %input.day, slot = %input.slot, id = %input.id))]
pub async fn unassign(
    template: Template,
    State(app): State<AppState>,
    Form(input): Form<CellInput>,
) -> impl IntoResponse {
    let planner = crate::try_page_response!(sync: planner_for(Some(&input.week)), template);
    let day = crate::try_page_response!(sync: parse_day(&input.day), template);
    let slot = crate::try_page_response!(sync: parse_slot(&input.slot), template);

    let removed = crate::try_page_response!(
        sync: planner.unassign(&mut *app.plans.lock().await, day, slot, &input.id),
        template
    );

    if removed == 0 {
        tracing::debug!("Nothing to remove");
    }

    Redirect::to(&week_url(planner.week())).into_response()
}

#[tracing::instrument(skip_all, fields(week = ?input.week))]
pub async fn print(
    template: Template,
    State(app): State<AppState>,
    Query(input): Query<WeekQuery>,
) -> impl IntoResponse {
    let planner = crate::try_page_response!(sync: planner_for(input.week.as_deref()), template);
    let document = planner.export_document(&*app.plans.lock().await);

    template
        .render(PrintTemplate {
            back_url: week_url(planner.week()),
            document,
        })
        .into_response()
}

#[tracing::instrument(skip_all, fields(week = ?input.week))]
pub async fn export(
    template: Template,
    State(app): State<AppState>,
    Query(input): Query<WeekQuery>,
) -> impl IntoResponse {
    let planner = crate::try_page_response!(sync: planner_for(input.week.as_deref()), template);
    let document = planner.export_document(&*app.plans.lock().await);
    let filename = document.filename();
    let options = app.config.export.clone();

    let rendered = tokio::task::spawn_blocking(move || pdf::render(&document, &options))
        .await
        .map_err(|err| mealdeck_shared::Error::Server(format!("pdf task: {err}")))
        .and_then(|result| result);
    let bytes = crate::try_page_response!(sync: rendered, template);

    tracing::info!(%filename, size = bytes.len(), "Meal plan exported");

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
