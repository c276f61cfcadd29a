use axum::extract::State;
use axum::response::Response;
use emblm_catalog::{render as render_view, resolve_path, CategoryPage, CategoryView};
use emblm_protocol::BlogPost;
use maud::{html, Markup};

use super::thought_hub::post_href;
use crate::AppState;

const RELATED_LIMIT: usize = 3;

fn detail_page(page: &CategoryPage<'_>, related: &[BlogPost]) -> Markup {
    html! {
        section.category-hero {
            div.category-title {
                h1 {
                    span.line-one { (page.title.first) }
                    @if !page.title.second.is_empty() {
                        span.line-two { (page.title.second) }
                    }
                }
            }
            figure.category-image {
                (super::image_with_fallback(&page.hero.src, page.hero.fallback, &page.hero.alt))
            }
            p.description { (page.description) }
        }
        section.category-details {
            @for block in page.details {
                div.detail-block {
                    @if let Some(title) = &block.title {
                        h2 { (title) }
                    }
                    @if let Some(subtitle) = &block.subtitle {
                        h3 { (subtitle) }
                    }
                    ul {
                        @for item in &block.items {
                            li { (item) }
                        }
                    }
                }
            }
        }
        @if !related.is_empty() {
            section.related-posts {
                h2 { "From the Thought Hub" }
                ul {
                    @for post in related {
                        li { a href=(post_href(&post.id)) { (post.title()) } }
                    }
                }
            }
        }
    }
}

fn not_found(name: &str) -> Markup {
    html! {
        section.category-missing {
            p { "Category not found." }
            p.muted { (name) }
        }
    }
}

/// Posts whose category label resolves to this category's route.
async fn related_posts(state: &AppState, page: &CategoryPage<'_>) -> Vec<BlogPost> {
    let posts = match state.store().list().await {
        Ok(posts) => posts,
        Err(err) => {
            tracing::warn!(error = %err, "skipping related posts");
            return Vec::new();
        }
    };
    let target = page.record.path();
    posts
        .into_iter()
        .filter(|p| resolve_path(state.registry(), &p.draft.category) == target)
        .take(RELATED_LIMIT)
        .collect()
}

pub(crate) async fn page(State(state): State<AppState>, name: String) -> Response {
    match render_view(state.registry(), &name) {
        CategoryView::Found(page) => {
            let related = related_posts(&state, &page).await;
            super::render(&page.record.name, detail_page(&page, &related))
        }
        CategoryView::NotFound { name } => super::render("Not Found", not_found(&name)),
    }
}
