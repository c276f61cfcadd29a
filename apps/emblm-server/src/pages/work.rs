use axum::extract::State;
use axum::response::Response;
use maud::html;

use crate::AppState;

/// Portfolio banner followed by the category index.
pub(crate) async fn page(State(state): State<AppState>) -> Response {
    let body = html! {
        (super::hero(
            "hero-dark",
            "Our Work",
            "A portfolio of brands transformed, stories told, and futures shaped.",
        ))
        section.category-index {
            ul {
                @for record in state.registry().iter() {
                    li { a href=(record.path()) { (record.name) } }
                }
            }
        }
    };
    super::render("Work", body)
}
