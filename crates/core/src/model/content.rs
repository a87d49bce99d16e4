use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker a fill-in-the-blank template uses for the missing word.
pub const BLANK_MARKER: &str = "___";

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("sentence template is empty")]
    EmptyTemplate,

    #[error("sentence template has no blank marker")]
    MissingBlankMarker,

    #[error("correct answer is empty")]
    EmptyAnswer,
}

//
// ─── CONTENT RECORDS ───────────────────────────────────────────────────────────
//

/// A word and its translation, used by matching exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    source: String,
    target: String,
}

impl MatchingPair {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// One fill-in-the-blank task: a sentence with a blank, the correct word,
/// and the distractor words offered alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBlankPayload {
    template: String,
    correct_answer: String,
    distractors: Vec<String>,
}

impl FillBlankPayload {
    /// Validates and builds a fill-in-the-blank payload.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the template is empty, lacks the blank
    /// marker, or the correct answer is empty.
    pub fn new(
        template: impl Into<String>,
        correct_answer: impl Into<String>,
        distractors: Vec<String>,
    ) -> Result<Self, ContentError> {
        let template = template.into();
        let correct_answer = correct_answer.into();
        if template.trim().is_empty() {
            return Err(ContentError::EmptyTemplate);
        }
        if !template.contains(BLANK_MARKER) {
            return Err(ContentError::MissingBlankMarker);
        }
        if correct_answer.trim().is_empty() {
            return Err(ContentError::EmptyAnswer);
        }
        Ok(Self {
            template,
            correct_answer,
            distractors,
        })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn distractors(&self) -> &[String] {
        &self.distractors
    }

    /// Renders the sentence with the blank filled in.
    #[must_use]
    pub fn resolved(&self) -> String {
        self.template.replacen(BLANK_MARKER, &self.correct_answer, 1)
    }
}

/// One image-to-word record: an asset reference and the label naming it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageChoicePayload {
    image_ref: String,
    correct_answer: String,
}

impl ImageChoicePayload {
    #[must_use]
    pub fn new(image_ref: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            image_ref: image_ref.into(),
            correct_answer: correct_answer.into(),
        }
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }
}
