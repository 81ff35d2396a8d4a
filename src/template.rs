use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong, please retry later";
pub const THEME_COOKIE: &str = "theme";

/// Renders askama pages for a request. Knows the path and query the request
/// came in on, so forms can send the user back to the same view.
pub struct Template {
    pub current_url: String,
    pub current_path: String,
    /// The visitor picked the dark theme.
    pub dark: bool,
}

impl Template {
    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        self.render_status(StatusCode::OK, template)
    }

    pub fn render_status<T: askama::Template>(&self, status: StatusCode, template: T) -> Response {
        match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(err = %err, path = %self.current_path, "Failed to render template");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template. Error: {err}"),
                )
                    .into_response()
            }
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current_path = parts.uri.path().to_owned();
        let current_url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or_else(|| current_path.clone());
        let dark = CookieJar::from_headers(&parts.headers)
            .get(THEME_COOKIE)
            .is_some_and(|cookie| cookie.value() == "dark");

        Ok(Template {
            current_url,
            current_path,
            dark,
        })
    }
}

/// Only same-site relative paths are followed after an action.
pub fn safe_return_to(value: Option<&str>) -> &str {
    match value {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

#[derive(askama::Template)]
#[template(path = "422.html")]
pub struct InvalidTemplate {
    pub message: String,
}

#[derive(askama::Template)]
#[template(path = "500.html")]
pub struct ServerTemplate {
    pub message: &'static str,
}

impl Default for ServerTemplate {
    fn default() -> Self {
        Self {
            message: SERVER_ERROR_MESSAGE,
        }
    }
}

#[macro_export]
macro_rules! try_page_response {
    (sync: $result:expr, $template:expr) => {
        match $result {
            Ok(r) => r,
            Err(mealdeck_shared::Error::Validate(message)) => {
                return $template
                    .render_status(
                        axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                        $crate::template::InvalidTemplate { message },
                    )
                    .into_response();
            }
            Err(mealdeck_shared::Error::NotFound) => {
                return $template
                    .render_status(
                        axum::http::StatusCode::NOT_FOUND,
                        $crate::template::NotFoundTemplate,
                    )
                    .into_response();
            }
            Err(err) => {
                tracing::error!(err = %err, "Request failed");

                return $template
                    .render_status(
                        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                        $crate::template::ServerTemplate::default(),
                    )
                    .into_response();
            }
        }
    };

    ($result:expr, $template:expr) => {
        $crate::try_page_response!(sync: $result.await, $template)
    };
}
