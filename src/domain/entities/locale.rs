use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

/// Text direction for the rendered locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl Locale {
    pub fn pick<'a>(&self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Locale::En => en,
            Locale::Ar => ar,
        }
    }

    pub fn dir(&self) -> TextDirection {
        match self {
            Locale::En => TextDirection::Ltr,
            Locale::Ar => TextDirection::Rtl,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    #[serde(default)]
    pub locale: Locale,
}
