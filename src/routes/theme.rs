use axum::{
    extract::Form,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;

use crate::template::{THEME_COOKIE, Template, safe_return_to};

#[derive(Deserialize)]
pub struct ThemeInput {
    pub return_to: Option<String>,
}

/// Switches between the light and dark theme and keeps the choice in a
/// cookie.
#[tracing::instrument(skip_all)]
pub async fn toggle(
    template: Template,
    jar: CookieJar,
    Form(input): Form<ThemeInput>,
) -> impl IntoResponse {
    let theme = if template.dark { "light" } else { "dark" };
    tracing::debug!(theme, "Theme switched");

    let cookie = Cookie::build((THEME_COOKIE, theme))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent()
        .build();

    (
        jar.add(cookie),
        Redirect::to(safe_return_to(input.return_to.as_deref())),
    )
}
