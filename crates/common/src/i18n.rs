//! French/Arabic text resolution.
//!
//! The registry is bilingual: every user-facing label exists in French and
//! in Arabic, and the caller's language decides which one is returned.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// French.
    #[default]
    Fr,
    /// Arabic.
    Ar,
}

/// Text direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl Lang {
    /// Language code as stored and sent over the wire.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }

    /// Writing direction for this language.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Fr => Direction::Ltr,
            Self::Ar => Direction::Rtl,
        }
    }

    /// Pick the first supported language from an `Accept-Language` header.
    ///
    /// Quality weights are honoured; ties keep header order.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, Self)> = header
            .split(',')
            .enumerate()
            .filter_map(|(pos, part)| {
                let mut pieces = part.trim().split(';');
                let lang = pieces.next()?.parse::<Self>().ok()?;
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((quality, pos, lang))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|(_, _, lang)| *lang)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a language tag is not supported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLang(pub String);

impl FromStr for Lang {
    type Err = UnsupportedLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept full tags such as `ar-MR` by looking at the primary subtag.
        let primary = s.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "ar" => Ok(Self::Ar),
            _ => Err(UnsupportedLang(s.to_string())),
        }
    }
}

/// Resolve a French/Arabic pair for the given language.
#[must_use]
pub const fn t<'a>(lang: Lang, fr: &'a str, ar: &'a str) -> &'a str {
    match lang {
        Lang::Fr => fr,
        Lang::Ar => ar,
    }
}

/// An owned French/Arabic text pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    pub fr: String,
    pub ar: String,
}

impl Bilingual {
    /// Build a pair from two literals.
    pub fn new(fr: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            fr: fr.into(),
            ar: ar.into(),
        }
    }

    /// Text for the given language.
    #[must_use]
    pub fn resolve(&self, lang: Lang) -> &str {
        t(lang, &self.fr, &self.ar)
    }
}
