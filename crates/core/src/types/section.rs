//! Content section keys and the pages they belong to.

use serde::{Deserialize, Serialize};

/// Key naming an independently editable block of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "section_key", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    /// Page banner. On the home page it also carries the slider images.
    Hero,
    /// About page introduction with a side image.
    Intro,
    /// List of value cards.
    Values,
    /// Home page call to action pointing at the contact form.
    ContactCta,
    /// Home page teaser for the about page.
    AboutPreview,
}

impl SectionKey {
    /// Sections whose content is edited and rendered as plain text.
    ///
    /// Everything else holds HTML produced by the rich text editor.
    #[must_use]
    pub const fn is_plain_text(self) -> bool {
        matches!(self, Self::Hero | Self::ContactCta | Self::AboutPreview)
    }

    /// Human-readable label for admin forms.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Intro => "Intro",
            Self::Values => "Values",
            Self::ContactCta => "Contact call to action",
            Self::AboutPreview => "About preview",
        }
    }

    /// Database and URL representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Intro => "intro",
            Self::Values => "values",
            Self::ContactCta => "contact_cta",
            Self::AboutPreview => "about_preview",
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(Self::Hero),
            "intro" => Ok(Self::Intro),
            "values" => Ok(Self::Values),
            "contact_cta" => Ok(Self::ContactCta),
            "about_preview" => Ok(Self::AboutPreview),
            _ => Err(format!("Invalid section key: {s}")),
        }
    }
}

/// A page whose content is split into sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPage {
    /// The landing page.
    Home,
    /// The about page.
    About,
}

impl SectionPage {
    /// Table holding this page's sections.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Home => "home_sections",
            Self::About => "about_sections",
        }
    }

    /// Section keys shown on this page, in page order.
    #[must_use]
    pub const fn keys(self) -> &'static [SectionKey] {
        match self {
            Self::Home => &[
                SectionKey::Hero,
                SectionKey::AboutPreview,
                SectionKey::Values,
                SectionKey::ContactCta,
            ],
            Self::About => &[SectionKey::Hero, SectionKey::Intro, SectionKey::Values],
        }
    }

    /// Whether `key` belongs on this page.
    #[must_use]
    pub fn contains(self, key: SectionKey) -> bool {
        self.keys().contains(&key)
    }
}

impl std::fmt::Display for SectionPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::About => write!(f, "about"),
        }
    }
}
