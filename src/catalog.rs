//! Fixed choices offered to the user: quote categories, visual templates and narrator voices.

use std::{fmt, str::FromStr};

use crate::foundation::error::WisdomError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuoteCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Topic handed to the quote service.
    pub query: &'static str,
}

pub const QUOTE_CATEGORIES: [QuoteCategory; 7] = [
    QuoteCategory {
        id: "wisdom",
        name: "Knowledge & Wisdom",
        description: "The gates of intellect",
        query: "Hazrat Ali quotes on knowledge and wisdom",
    },
    QuoteCategory {
        id: "courage",
        name: "Courage & Valor",
        description: "Strength of the heart",
        query: "Hazrat Ali sayings on bravery and courage",
    },
    QuoteCategory {
        id: "justice",
        name: "Justice & Equity",
        description: "The foundation of rule",
        query: "Hazrat Ali quotes on justice and leadership",
    },
    QuoteCategory {
        id: "worldliness",
        name: "Zuhd (Asceticism)",
        description: "Reality of this world",
        query: "Hazrat Ali quotes on worldliness and zuhd",
    },
    QuoteCategory {
        id: "friendship",
        name: "Friendship & People",
        description: "Character and company",
        query: "Hazrat Ali quotes on friends and social manners",
    },
    QuoteCategory {
        id: "patience",
        name: "Patience & Piety",
        description: "Endurance and Taqwa",
        query: "Hazrat Ali quotes on patience and god-consciousness",
    },
    QuoteCategory {
        id: "eloquence",
        name: "Eloquent Sayings",
        description: "Short peak of wisdom",
        query: "Nahj al-Balagha short sayings",
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub preview_url: &'static str,
}

pub const TEMPLATES: [VideoTemplate; 5] = [
    VideoTemplate {
        id: "royal-gold",
        name: "Royal Gold",
        preview_url: "https://images.unsplash.com/photo-1584551246679-0daf3d275d0f?auto=format&fit=crop&q=80&w=200&h=355",
    },
    VideoTemplate {
        id: "ocean-calm",
        name: "Ocean Calm",
        preview_url: "https://images.unsplash.com/photo-1505118380757-91f5f5632de0?auto=format&fit=crop&q=80&w=200&h=355",
    },
    VideoTemplate {
        id: "emerald-forest",
        name: "Emerald Deen",
        preview_url: "https://images.unsplash.com/photo-1542273917363-3b1817f69a2d?auto=format&fit=crop&q=80&w=200&h=355",
    },
    VideoTemplate {
        id: "minimalist-white",
        name: "Pure White",
        preview_url: "https://images.unsplash.com/photo-1470790376778-a9fbc86d70e2?auto=format&fit=crop&q=80&w=200&h=355",
    },
    VideoTemplate {
        id: "midnight-quran",
        name: "Night Wisdom",
        preview_url: "https://images.unsplash.com/photo-1507413245164-6160d8298b31?auto=format&fit=crop&q=80&w=200&h=355",
    },
];

/// Prebuilt narrator voices of the speech service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Voice {
    Kore,
    Puck,
    Zephyr,
    Charon,
}

impl Voice {
    pub const ALL: [Voice; 4] = [Voice::Kore, Voice::Puck, Voice::Zephyr, Voice::Charon];

    pub fn id(self) -> &'static str {
        match self {
            Voice::Kore => "Kore",
            Voice::Puck => "Puck",
            Voice::Zephyr => "Zephyr",
            Voice::Charon => "Charon",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Voice::Kore => "Kore (Strong/Deep)",
            Voice::Puck => "Puck (Soft/Narrative)",
            Voice::Zephyr => "Zephyr (Friendly)",
            Voice::Charon => "Charon (Calm)",
        }
    }

    pub fn language(self) -> &'static str {
        "Urdu"
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Voice {
    type Err = WisdomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::ALL
            .into_iter()
            .find(|v| v.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WisdomError::validation(format!("unknown voice '{s}'")))
    }
}

/// Resolve a category id, falling back to the first category.
pub fn category(id: &str) -> &'static QuoteCategory {
    QUOTE_CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .unwrap_or(&QUOTE_CATEGORIES[0])
}

/// Resolve a template id, falling back to the first template.
pub fn template(id: &str) -> &'static VideoTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .unwrap_or(&TEMPLATES[0])
}

pub fn is_known_category(id: &str) -> bool {
    QUOTE_CATEGORIES.iter().any(|c| c.id == id)
}

pub fn is_known_template(id: &str) -> bool {
    TEMPLATES.iter().any(|t| t.id == id)
}

/// Stock-footage search phrase for a category's background video.
pub fn background_query(category_id: &str) -> String {
    format!("ancient library desert sword justice {category_id}")
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;
