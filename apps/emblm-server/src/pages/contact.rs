use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;
use maud::{html, Markup};
use serde::Deserialize;

use super::{CONTACT_EMAIL, CONTACT_PHONE, LOCATION};

const PROJECT_TYPES: &[&str] = &[
    "Brand Identity",
    "Creative Design",
    "Digital",
    "Marketing",
    "Strategy",
    "Multimedia",
    "Extended Services",
];

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Inquiry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    project: String,
    #[serde(default)]
    message: String,
}

impl Inquiry {
    fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if !self.email.contains('@') {
            Some("email")
        } else if self.message.trim().is_empty() {
            Some("message")
        } else {
            None
        }
    }
}

enum Notice<'a> {
    None,
    Sent,
    Missing(&'a str),
}

fn form(inquiry: &Inquiry, notice: Notice<'_>) -> Markup {
    html! {
        (super::hero(
            "hero-red",
            "Let's Create",
            "Ready to position your brand to lead? Tell us where you want to go.",
        ))
        section.contact {
            div.contact-details {
                div { h3 { "Email Us" } a href={ "mailto:" (CONTACT_EMAIL) } { (CONTACT_EMAIL) } }
                div { h3 { "WhatsApp" } a href={ "tel:" (CONTACT_PHONE.replace(' ', "")) } { (CONTACT_PHONE) } }
                div { h3 { "Location" } p { (LOCATION) } p.muted { "Creating for brands worldwide" } }
            }
            @match notice {
                Notice::Sent => {
                    p.notice.ok { "Thank you. We will be in touch shortly." }
                }
                Notice::Missing(field) => {
                    p.notice.error { "Please provide your " (field) "." }
                }
                Notice::None => {}
            }
            form.contact-form method="post" action=(emblm_catalog::FixedRoute::Contact.path()) {
                label for="name" { "Name" }
                input #name type="text" name="name" required value=(inquiry.name);
                label for="email" { "Email" }
                input #email type="email" name="email" required value=(inquiry.email);
                label for="company" { "Company" }
                input #company type="text" name="company" value=(inquiry.company);
                label for="project" { "Project Type" }
                select #project name="project" {
                    option value="" { "Select a service..." }
                    @for kind in PROJECT_TYPES {
                        option value=(kind) selected[inquiry.project == *kind] { (kind) }
                    }
                }
                label for="message" { "Message" }
                textarea #message name="message" required
                    placeholder="Tell us about your project, goals, and timeline..." { (inquiry.message) }
                button type="submit" { "Send Message" }
            }
        }
    }
}

pub(crate) async fn page() -> Response {
    super::render("Contact", form(&Inquiry::default(), Notice::None))
}

pub(crate) async fn submit(Form(inquiry): Form<Inquiry>) -> Response {
    if let Some(field) = inquiry.missing_field() {
        let body = form(&inquiry, Notice::Missing(field));
        return (StatusCode::BAD_REQUEST, super::render("Contact", body)).into_response();
    }
    tracing::info!(
        target: "emblm::contact",
        name = %inquiry.name.trim(),
        email = %inquiry.email.trim(),
        company = %inquiry.company.trim(),
        project = %inquiry.project,
        message_len = inquiry.message.len(),
        "contact inquiry received"
    );
    super::render("Contact", form(&Inquiry::default(), Notice::Sent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reports_first_missing_field() {
        let mut inq = Inquiry {
            name: "Ava".into(),
            email: "ava@example.com".into(),
            message: "Hello".into(),
            ..Default::default()
        };
        assert_eq!(inq.missing_field(), None);
        inq.email = "nope".into();
        assert_eq!(inq.missing_field(), Some("email"));
        inq.name = " ".into();
        assert_eq!(inq.missing_field(), Some("name"));
    }

    #[test]
    fn selected_project_is_preserved() {
        let inq = Inquiry {
            project: "Strategy".into(),
            ..Default::default()
        };
        let out = form(&inq, Notice::None).into_string();
        assert!(out.contains("<option value=\"Strategy\" selected>"));
        assert!(!out.contains("<option value=\"Digital\" selected>"));
    }
}
