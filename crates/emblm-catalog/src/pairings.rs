//! "We design X for Y" showcase: service categories paired with the
//! audiences they are pitched to. Labels are cross-linked into the registry
//! through [`resolve_path`].

use serde::Serialize;

use crate::registry::Registry;
use crate::slug::{resolve_path, split_camel_case};

const PAIRINGS: &[(&str, &[&str])] = &[
    ("BrandIdentity", &["ConsumerLifestyle", "CorporateBusiness", "Technology"]),
    ("CreativeDesign", &["CorporateBusiness", "SocialImpact", "Education"]),
    ("DigitalPresence", &["ConsumerLifestyle", "SocialImpact", "Healthcare"]),
    ("SocialMedia", &["Education", "Government"]),
    ("Marketing", &["Government", "Technology"]),
    ("Multimedia", &["Healthcare", "ConsumerLifestyle"]),
    ("Consulting", &["Technology", "SocialImpact", "CorporateBusiness"]),
    ("ExtendedExperiences", &["CorporateBusiness", "ConsumerLifestyle"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub path: String,
}

impl Link {
    fn resolve(registry: &Registry, token: &str) -> Self {
        let label = split_camel_case(token);
        let path = resolve_path(registry, &label);
        Self { label, path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    pub design: Link,
    pub audiences: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Showcase {
    pub pairings: Vec<Pairing>,
    /// Distinct design links in first-seen order.
    pub designs: Vec<Link>,
    /// Distinct audience links in first-seen order.
    pub audiences: Vec<Link>,
}

impl Showcase {
    pub fn build(registry: &Registry) -> Self {
        let pairings: Vec<Pairing> = PAIRINGS
            .iter()
            .map(|(design, audiences)| Pairing {
                design: Link::resolve(registry, design),
                audiences: audiences
                    .iter()
                    .map(|a| Link::resolve(registry, a))
                    .collect(),
            })
            .collect();
        let designs = dedup(pairings.iter().map(|p| &p.design));
        let audiences = dedup(pairings.iter().flat_map(|p| p.audiences.iter()));
        Self {
            pairings,
            designs,
            audiences,
        }
    }
}

fn dedup<'a>(links: impl Iterator<Item = &'a Link>) -> Vec<Link> {
    let mut out: Vec<Link> = Vec::new();
    for link in links {
        if !out.iter().any(|l| l.label == link.label) {
            out.push(link.clone());
        }
    }
    out
}
