use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stylistic tone applied to a translation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "tone", rename_all = "lowercase")]
pub enum Tone {
    Natural,
    Gentle,
    Cute,
    Depressed,
    Angry,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Natural,
        Tone::Gentle,
        Tone::Cute,
        Tone::Depressed,
        Tone::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Natural => "natural",
            Tone::Gentle => "gentle",
            Tone::Cute => "cute",
            Tone::Depressed => "depressed",
            Tone::Angry => "angry",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "natural" => Ok(Tone::Natural),
            "gentle" => Ok(Tone::Gentle),
            "cute" => Ok(Tone::Cute),
            "depressed" => Ok(Tone::Depressed),
            "angry" => Ok(Tone::Angry),
            other => Err(format!("unknown tone: {}", other)),
        }
    }
}

/// Kind of event recorded in the translation access log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "history_action", rename_all = "lowercase")]
pub enum HistoryAction {
    Created,
    Viewed,
    Favorited,
    Unfavorited,
    Deleted,
}

/// Page/per-page query parameters with clamped accessors
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: u32 = 20;
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.per_page() as i64
    }

    pub fn offset(&self) -> i64 {
        ((self.page() - 1) as i64) * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_parses_all_known_values() {
        for tone in Tone::ALL {
            assert_eq!(tone.as_str().parse::<Tone>().unwrap(), tone);
        }
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn tone_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Tone::Gentle).unwrap(), "\"gentle\"");
        let tone: Tone = serde_json::from_str("\"angry\"").unwrap();
        assert_eq!(tone, Tone::Angry);
    }

    #[test]
    fn pagination_clamps_inputs() {
        let p = Pagination { page: Some(0), per_page: Some(10_000) };
        assert_eq!(p.page(), 1);
        assert_eq!(p.per_page(), Pagination::MAX_PER_PAGE);
        assert_eq!(p.offset(), 0);

        let p = Pagination { page: Some(3), per_page: None };
        assert_eq!(p.per_page(), Pagination::DEFAULT_PER_PAGE);
        assert_eq!(p.offset(), 40);
    }
}
