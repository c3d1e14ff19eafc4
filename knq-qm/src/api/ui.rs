//! UI serving routes
//!
//! Serves the embedded HTML/JS views: the public submission/display page
//! and the admin page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const ADMIN_HTML: &str = include_str!("../ui/admin.html");
const APP_JS: &str = include_str!("../ui/app.js");
const ADMIN_JS: &str = include_str!("../ui/admin.js");
const UI_CSS: &str = include_str!("../ui/knq-ui.css");

/// GET /
///
/// Public page: submission form, now-singing card, upcoming list
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /admin
///
/// Admin page: full active queue with play-now and remove actions
pub async fn serve_admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/admin.js
pub async fn serve_admin_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        ADMIN_JS,
    )
        .into_response()
}

/// GET /static/knq-ui.css
pub async fn serve_ui_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], UI_CSS).into_response()
}
