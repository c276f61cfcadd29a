//! Server-rendered pages. Every page shares [`layout`]: navigation built from
//! the fixed routes, then the page body, then the footer.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Response};
use emblm_catalog::FixedRoute;
use maud::{html, Markup, DOCTYPE};

pub(crate) mod about;
pub(crate) mod category;
pub(crate) mod contact;
pub(crate) mod home;
pub(crate) mod thought_hub;
pub(crate) mod work;

const SITE_CSS: &str = include_str!("../../assets/site.css");

pub(crate) const CONTACT_EMAIL: &str = "shravy.vj@theemblm.com";
pub(crate) const CONTACT_PHONE: &str = "+91 9380824977";
pub(crate) const LOCATION: &str = "Indore, India";

pub(crate) async fn site_css() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        SITE_CSS,
    )
}

fn nav() -> Markup {
    let links = FixedRoute::ALL.into_iter().filter(|r| *r != FixedRoute::Home);
    html! {
        header.site-nav {
            a.brand href=(FixedRoute::Home.path()) { "The Emblm" }
            nav {
                ul {
                    @for route in links {
                        li { a href=(route.path()) { (route.label()) } }
                    }
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer.site-footer {
            div.footer-brand {
                p { "Positioning brands to lead through strategic thinking, creative excellence, and purposeful execution." }
            }
            div.footer-contact {
                h3 { "Get in Touch" }
                a href={ "mailto:" (CONTACT_EMAIL) } { (CONTACT_EMAIL) }
                a href={ "tel:" (CONTACT_PHONE.replace(' ', "")) } { (CONTACT_PHONE) }
                span { (LOCATION) }
            }
            p.copyright { "© 2025 The Emblm" }
        }
    }
}

pub(crate) fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | The Emblm" }
                link rel="stylesheet" href=(crate::router::paths::SITE_CSS);
            }
            body {
                (nav())
                main { (body) }
                (footer())
            }
        }
    }
}

/// Simple banner used by the static pages.
pub(crate) fn hero(class: &str, heading: &str, lede: &str) -> Markup {
    html! {
        section class={ "hero " (class) } {
            h1 { (heading) }
            p.lede { (lede) }
        }
    }
}

pub(crate) fn render(title: &str, body: Markup) -> Response {
    Html(layout(title, body).into_string()).into_response()
}

/// `<img>` that swaps to `fallback` once if `src` fails to load.
pub(crate) fn image_with_fallback(src: &str, fallback: &str, alt: &str) -> Markup {
    html! {
        img src=(src) alt=(alt) data-fallback=(fallback)
            onerror="this.onerror=null;this.src=this.dataset.fallback;";
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_links_every_fixed_page() {
        let out = layout("Home", html! { p { "body" } }).into_string();
        for route in FixedRoute::ALL {
            assert!(out.contains(&format!("href=\"{}\"", route.path())));
        }
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>Home | The Emblm</title>"));
    }

    #[test]
    fn fallback_image_escapes_attribute_values() {
        let out = image_with_fallback("/x.jpg", "data:a'b", "A \"quoted\" alt").into_string();
        assert!(out.contains("data-fallback=\"data:a'b\""));
        assert!(out.contains("alt=\"A &quot;quoted&quot; alt\""));
    }
}
