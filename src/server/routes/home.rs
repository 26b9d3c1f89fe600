use crate::server::pages;
use axum::response::Html;

/// GET /
pub async fn index() -> Html<String> {
    Html(pages::index())
}
