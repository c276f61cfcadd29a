use axum::response::Response;
use maud::html;

pub(crate) async fn page() -> Response {
    let body = html! {
        (super::hero(
            "hero-cream",
            "About The Emblm",
            "Every brand has its empty chair. We make sure yours commands attention.",
        ))
    };
    super::render("About", body)
}
