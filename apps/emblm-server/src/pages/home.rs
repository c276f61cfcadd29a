use axum::extract::State;
use axum::response::Response;
use emblm_catalog::{resolve_path, FixedRoute};
use maud::html;

use crate::AppState;

/// (title, summary, category label the card links to)
const SERVICES: &[(&str, &str, &str)] = &[
    ("Brand Identity", "Complete visual identity systems that capture your essence and speak to your audience.", "BrandIdentity"),
    ("Creative Design", "Compelling creative solutions across all mediums and touchpoints.", "CreativeDesign"),
    ("Digital", "Digital experiences that engage, convert, and delight your users.", "DigitalPresence"),
    ("Social", "Social strategies that build communities and drive engagement.", "SocialMedia"),
    ("Marketing", "Integrated marketing campaigns that deliver measurable results.", "Marketing"),
    ("Multimedia", "Video and audio content that tells your story with impact.", "Multimedia"),
    ("Strategy", "Strategic thinking that aligns your brand with business objectives.", "Consulting"),
    ("Extended", "Specialized services that extend your brand into new territories.", "ExtendedExperiences"),
];

pub(crate) async fn page(State(state): State<AppState>) -> Response {
    let registry = state.registry();
    let showcase = state.showcase();
    let body = html! {
        section.hero.hero-home {
            p.eyebrow { "Strategy · Identity · Communications" }
            h1 {
                span.light { "Positioned to" }
                span.strong { "Lead, with presence that is felt" }
            }
            p.lede {
                "Branding creates presence. Marketing creates purpose. We design stories and systems that make the world listen and remember."
            }
            div.cta {
                a.button.primary href=(FixedRoute::Work.path()) { "Explore Our Work" }
                a.button.secondary href=(FixedRoute::Contact.path()) { "Let's Talk" }
            }
        }
        section.about-teaser {
            h2 { "Every brand has its empty chair" }
            p {
                "The Emblm is built on the geometry of life itself: an infinite pattern of strategy, craft, and story."
            }
            a href=(FixedRoute::About.path()) { "About The Emblm" }
        }
        section.services {
            h2 { "Services" }
            div.grid {
                @for (title, summary, label) in SERVICES {
                    a.card href=(resolve_path(registry, label)) {
                        h3 { (title) }
                        p { (summary) }
                    }
                }
            }
        }
        section.we-design {
            h2 { "We design" }
            ul.pairings {
                @for pairing in &showcase.pairings {
                    li {
                        a.design href=(pairing.design.path) { (pairing.design.label) }
                        " for "
                        @for (i, audience) in pairing.audiences.iter().enumerate() {
                            @if i > 0 { ", " }
                            a.audience href=(audience.path) { (audience.label) }
                        }
                    }
                }
            }
        }
        section.audiences {
            h2 { "Who we design for" }
            ul {
                @for audience in &showcase.audiences {
                    li { a href=(audience.path) { (audience.label) } }
                }
            }
        }
    };
    super::render("Home", body)
}
