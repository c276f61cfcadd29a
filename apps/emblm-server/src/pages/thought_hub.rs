use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use emblm_catalog::{resolve_path, FixedRoute, Registry};
use emblm_protocol::BlogPost;
use emblm_store::content::{display_read_time, plain_excerpt};
use maud::{html, Markup, PreEscaped};
use rand::seq::SliceRandom;
use serde::Deserialize;

const EXCERPT_CHARS: usize = 100;
const OTHER_POSTS: usize = 3;

/// Shown while the store has no posts.
struct Featured {
    title: &'static str,
    excerpt: &'static str,
    date: &'static str,
    category: &'static str,
    read_time: &'static str,
    image: &'static str,
}

const FEATURED: &[Featured] = &[
    Featured {
        title: "The Psychology of Brand Positioning",
        excerpt: "How brands occupy mental real estate and why some command more attention than others.",
        date: "Jan 15, 2025",
        category: "Strategy",
        read_time: "5 min read",
        image: "https://images.pexels.com/photos/3184287/pexels-photo-3184287.jpeg?auto=compress&cs=tinysrgb&w=800",
    },
    Featured {
        title: "Design Systems That Scale",
        excerpt: "Building visual identities that grow with your business and adapt to any medium.",
        date: "Jan 12, 2025",
        category: "Design",
        read_time: "7 min read",
        image: "https://images.pexels.com/photos/3184291/pexels-photo-3184291.jpeg?auto=compress&cs=tinysrgb&w=800",
    },
    Featured {
        title: "The Future of Digital Marketing",
        excerpt: "How AI and emerging technologies are reshaping the way brands connect with audiences.",
        date: "Jan 10, 2025",
        category: "Digital",
        read_time: "6 min read",
        image: "https://images.pexels.com/photos/3184294/pexels-photo-3184294.jpeg?auto=compress&cs=tinysrgb&w=800",
    },
];

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HubQuery {
    #[serde(default)]
    post: Option<String>,
}

pub(crate) fn post_href(id: &str) -> String {
    format!("{}?post={}", FixedRoute::ThoughtHub.path(), id)
}

fn excerpt_for(post: &BlogPost) -> String {
    match post.draft.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(excerpt) => excerpt.to_string(),
        None => plain_excerpt(post.content(), EXCERPT_CHARS),
    }
}

fn post_card(registry: &Registry, post: &BlogPost) -> Markup {
    let category = &post.draft.category;
    html! {
        article.post-card {
            @if let Some(image) = &post.draft.image_url {
                div.post-image { img src=(image) alt=(post.title()) loading="lazy"; }
            }
            div.post-body {
                div.post-meta {
                    a.post-category href=(resolve_path(registry, category)) { (category) }
                    time datetime=(post.created_at.to_rfc3339()) {
                        (post.created_at.format("%b %-d, %Y").to_string())
                    }
                }
                h2 { a href=(post_href(&post.id)) { (post.title()) } }
                p.excerpt { (excerpt_for(post)) }
                div.post-footer {
                    span.read-time { (display_read_time(post.draft.read_time.as_deref(), post.content())) }
                    a.read-more href=(post_href(&post.id)) { "Read More" }
                }
            }
        }
    }
}

fn featured_card(registry: &Registry, item: &Featured) -> Markup {
    html! {
        article.post-card.featured {
            div.post-image { img src=(item.image) alt=(item.title) loading="lazy"; }
            div.post-body {
                div.post-meta {
                    a.post-category href=(resolve_path(registry, item.category)) { (item.category) }
                    span { (item.date) }
                }
                h2 { (item.title) }
                p.excerpt { (item.excerpt) }
                div.post-footer { span.read-time { (item.read_time) } }
            }
        }
    }
}

fn hub_header() -> Markup {
    super::hero(
        "hero-dark",
        "Thought Hub",
        "Insights, perspectives, and provocations from the minds shaping tomorrow's brands.",
    )
}

fn index(registry: &Registry, posts: &[BlogPost]) -> Markup {
    html! {
        (hub_header())
        section.posts-grid {
            @if posts.is_empty() {
                @for item in FEATURED {
                    (featured_card(registry, item))
                }
            } @else {
                @for post in posts {
                    (post_card(registry, post))
                }
            }
        }
    }
}

fn detail(registry: &Registry, post: &BlogPost, others: &[BlogPost]) -> Markup {
    let author = post
        .draft
        .author
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Unknown Author");
    html! {
        article.post-detail {
            aside.post-aside {
                @if let Some(image) = &post.draft.image_url {
                    img src=(image) alt=(post.title());
                } @else {
                    div.image-placeholder {}
                }
                p.author { (author) }
                p.date { (post.created_at.format("%a %b %d %Y").to_string()) }
                p.read-time { (display_read_time(post.draft.read_time.as_deref(), post.content())) }
                @if post.draft.ai_enhanced {
                    @if let Some(badge) = &post.draft.ai_badge {
                        p.ai-badge { (badge) }
                    }
                }
                @if !post.draft.tags.is_empty() {
                    ul.tags {
                        @for tag in &post.draft.tags {
                            li { (tag) }
                        }
                    }
                }
            }
            div.post-main {
                a.post-category href=(resolve_path(registry, &post.draft.category)) { (post.draft.category) }
                h1 { (post.title()) }
                div.post-content { (PreEscaped(post.content())) }
            }
        }
        @if !others.is_empty() {
            section.other-posts {
                h2 { "More from the Thought Hub" }
                div.posts-grid {
                    @for other in others {
                        (post_card(registry, other))
                    }
                }
            }
        }
    }
}

fn missing_post() -> Markup {
    html! {
        (hub_header())
        section.post-missing {
            p { "Post not found." }
            a href=(FixedRoute::ThoughtHub.path()) { "Back to the Thought Hub" }
        }
    }
}

/// Up to three posts other than `id`, in random order.
fn pick_others(posts: Vec<BlogPost>, id: &str) -> Vec<BlogPost> {
    let mut others: Vec<BlogPost> = posts.into_iter().filter(|p| p.id != id).collect();
    others.shuffle(&mut rand::rng());
    others.truncate(OTHER_POSTS);
    others
}

pub(crate) async fn page(
    State(state): State<crate::AppState>,
    Query(query): Query<HubQuery>,
) -> Response {
    let registry = state.registry();
    let posts = match state.store().list().await {
        Ok(posts) => posts,
        Err(err) => {
            tracing::warn!(error = %err, "thought hub could not list posts");
            Vec::new()
        }
    };
    let Some(id) = query.post.filter(|id| !id.trim().is_empty()) else {
        return super::render("Thought Hub", index(registry, &posts));
    };
    let Some(post) = posts.iter().find(|p| p.id == id).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            super::render("Post not found", missing_post()),
        )
            .into_response();
    };
    let others = pick_others(posts, &id);
    super::render(post.title(), detail(registry, &post, &others))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use emblm_protocol::BlogDraft;

    fn post(id: &str, title: &str) -> BlogPost {
        BlogPost {
            id: id.into(),
            draft: BlogDraft {
                title: title.into(),
                content: "<p>Hello <em>there</em></p>".into(),
                category: "Marketing".into(),
                ..Default::default()
            },
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn others_exclude_current_and_cap_at_three() {
        let posts: Vec<BlogPost> = (0..6).map(|i| post(&i.to_string(), "t")).collect();
        let others = pick_others(posts, "2");
        assert_eq!(others.len(), 3);
        assert!(others.iter().all(|p| p.id != "2"));
    }

    #[test]
    fn empty_store_shows_featured_posts() {
        let registry = Registry::embedded().unwrap();
        let out = index(&registry, &[]).into_string();
        assert!(out.contains("The Psychology of Brand Positioning"));
        assert!(out.contains("Design Systems That Scale"));
    }

    #[test]
    fn card_uses_plain_excerpt_and_estimated_read_time() {
        let registry = Registry::embedded().unwrap();
        let out = post_card(&registry, &post("abc", "Title")).into_string();
        assert!(out.contains("Hello there..."));
        assert!(out.contains("1 min read"));
        assert!(out.contains("href=\"/thought-hub?post=abc\""));
        // "Marketing" folds onto the Marketing & Communication slug.
        assert!(out.contains("href=\"/Marketing\""));
    }

    #[test]
    fn detail_renders_html_body_and_unknown_author() {
        let registry = Registry::embedded().unwrap();
        let out = detail(&registry, &post("abc", "Title"), &[]).into_string();
        assert!(out.contains("<p>Hello <em>there</em></p>"));
        assert!(out.contains("Unknown Author"));
        assert!(!out.contains("other-posts"));
    }
}
