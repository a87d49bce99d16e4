use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown topic: {raw}")]
pub struct ParseTopicError {
    raw: String,
}

/// Learning topic, one per course module.
///
/// A fixed enumeration keyed by topic identifier; the module number is the
/// column the progress store tracks completion under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Alphabet,
    Phrases,
    Numbers,
    Family,
    Food,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Alphabet,
        Topic::Phrases,
        Topic::Numbers,
        Topic::Family,
        Topic::Food,
    ];

    /// Stable string key for the topic.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Alphabet => "alphabet",
            Topic::Phrases => "phrases",
            Topic::Numbers => "numbers",
            Topic::Family => "family",
            Topic::Food => "food",
        }
    }

    /// Module number tracked by the progress store.
    #[must_use]
    pub fn module_number(&self) -> u8 {
        match self {
            Topic::Alphabet => 1,
            Topic::Phrases => 2,
            Topic::Numbers => 3,
            Topic::Family => 4,
            Topic::Food => 5,
        }
    }

    /// Content category holding this topic's matching pairs.
    ///
    /// Every topic ships a matching table.
    #[must_use]
    pub fn match_category(&self) -> &'static str {
        match self {
            Topic::Alphabet => "alphabet_match",
            Topic::Phrases => "phrases_match",
            Topic::Numbers => "numbers_match",
            Topic::Family => "family_match",
            Topic::Food => "food_match",
        }
    }

    /// Content category holding this topic's fill-in-the-blank rows, if any.
    #[must_use]
    pub fn fill_blank_category(&self) -> Option<&'static str> {
        match self {
            Topic::Phrases => Some("phrases_fill_blank"),
            Topic::Numbers => Some("numbers_fill_blank"),
            Topic::Food => Some("food_fill_blank"),
            Topic::Alphabet | Topic::Family => None,
        }
    }

    /// Content category holding this topic's image-choice records, if any.
    #[must_use]
    pub fn image_category(&self) -> Option<&'static str> {
        match self {
            Topic::Food => Some("image_choice_food"),
            _ => None,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = ParseTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseTopicError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_numbers_are_distinct() {
        let mut numbers: Vec<u8> = Topic::ALL.iter().map(Topic::module_number).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), Topic::ALL.len());
    }

    #[test]
    fn topic_roundtrips_through_str() {
        for topic in Topic::ALL {
            let parsed: Topic = topic.as_str().parse().unwrap();
            assert_eq!(parsed, topic);
        }
    }

    #[test]
    fn unknown_topic_fails_to_parse() {
        assert!("weather".parse::<Topic>().is_err());
    }

    #[test]
    fn only_some_topics_carry_fill_blank_content() {
        assert!(Topic::Phrases.fill_blank_category().is_some());
        assert!(Topic::Alphabet.fill_blank_category().is_none());
    }
}
