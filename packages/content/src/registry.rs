//! # Content Registry
//!
//! Static map of every editable field on the site: page → section → items.
//!
//! The registry is defined at build time and never mutated. Page markup
//! carries the same ids in its editable markers; the edit panel uses the
//! registry to list fields that may not be visible on screen.

use crate::record::ContentType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableItemDescriptor {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub label: &'static str,
    pub section: &'static str,
    pub page: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectionContent {
    pub name: &'static str,
    pub items: &'static [EditableItemDescriptor],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageContent {
    pub page: &'static str,
    pub title: &'static str,
    pub sections: &'static [SectionContent],
}

const fn item(
    id: &'static str,
    content_type: ContentType,
    label: &'static str,
    section: &'static str,
    page: &'static str,
) -> EditableItemDescriptor {
    EditableItemDescriptor {
        id,
        content_type,
        label,
        section,
        page,
    }
}

use crate::record::ContentType::{Image, ImageSlider, RichText, Text};

static HOME: &[SectionContent] = &[
    SectionContent {
        name: "hero",
        items: &[
            item("home.hero.title", Text, "Hero title", "hero", "home"),
            item("home.hero.subtitle", Text, "Hero subtitle", "hero", "home"),
            item("home.hero.image", Image, "Hero image", "hero", "home"),
        ],
    },
    SectionContent {
        name: "gallery",
        items: &[item(
            "home.gallery.slider",
            ImageSlider,
            "Campus gallery",
            "gallery",
            "home",
        )],
    },
    SectionContent {
        name: "welcome",
        items: &[
            item("home.welcome.heading", Text, "Welcome heading", "welcome", "home"),
            item("home.welcome.body", RichText, "Welcome message", "welcome", "home"),
        ],
    },
];

static ABOUT: &[SectionContent] = &[
    SectionContent {
        name: "mission",
        items: &[
            item("about.mission.heading", Text, "Mission heading", "mission", "about"),
            item("about.mission.body", RichText, "Mission statement", "mission", "about"),
        ],
    },
    SectionContent {
        name: "principal",
        items: &[
            item("about.principal.name", Text, "Principal name", "principal", "about"),
            item("about.principal.photo", Image, "Principal photo", "principal", "about"),
            item("about.principal.letter", RichText, "Principal letter", "principal", "about"),
        ],
    },
];

static ADMISSIONS: &[SectionContent] = &[
    SectionContent {
        name: "overview",
        items: &[
            item("admissions.overview.heading", Text, "Admissions heading", "overview", "admissions"),
            item("admissions.overview.body", RichText, "Admissions overview", "overview", "admissions"),
        ],
    },
    SectionContent {
        name: "dates",
        items: &[
            item("admissions.dates.open_day", Text, "Open day date", "dates", "admissions"),
            item("admissions.dates.deadline", Text, "Application deadline", "dates", "admissions"),
        ],
    },
];

static CONTACT: &[SectionContent] = &[SectionContent {
    name: "details",
    items: &[
        item("contact.details.address", Text, "Street address", "details", "contact"),
        item("contact.details.phone", Text, "Phone number", "details", "contact"),
        item("contact.details.email", Text, "Email address", "details", "contact"),
        item("contact.details.map", Image, "Map image", "details", "contact"),
    ],
}];

pub static CONTENT_REGISTRY: &[PageContent] = &[
    PageContent {
        page: "home",
        title: "Home",
        sections: HOME,
    },
    PageContent {
        page: "about",
        title: "About",
        sections: ABOUT,
    },
    PageContent {
        page: "admissions",
        title: "Admissions",
        sections: ADMISSIONS,
    },
    PageContent {
        page: "contact",
        title: "Contact",
        sections: CONTACT,
    },
];

pub fn pages() -> &'static [PageContent] {
    CONTENT_REGISTRY
}

pub fn page(name: &str) -> Option<&'static PageContent> {
    CONTENT_REGISTRY.iter().find(|p| p.page == name)
}

pub fn items_for_page(name: &str) -> impl Iterator<Item = &'static EditableItemDescriptor> {
    page(name)
        .into_iter()
        .flat_map(|p| p.sections.iter())
        .flat_map(|s| s.items.iter())
}

pub fn all_items() -> impl Iterator<Item = &'static EditableItemDescriptor> {
    CONTENT_REGISTRY
        .iter()
        .flat_map(|p| p.sections.iter())
        .flat_map(|s| s.items.iter())
}

pub fn find_item(id: &str) -> Option<&'static EditableItemDescriptor> {
    all_items().find(|item| item.id == id)
}
