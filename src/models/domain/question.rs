use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Every question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Category used when a manually authored question has none.
pub const DEFAULT_CATEGORY: &str = "Geral";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GradeLevel {
    #[serde(rename = "6ano")]
    Sixth,
    #[serde(rename = "7ano")]
    Seventh,
    #[serde(rename = "8ano")]
    Eighth,
    #[serde(rename = "9ano")]
    Ninth,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 4] = [
        GradeLevel::Sixth,
        GradeLevel::Seventh,
        GradeLevel::Eighth,
        GradeLevel::Ninth,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            GradeLevel::Sixth => "6ano",
            GradeLevel::Seventh => "7ano",
            GradeLevel::Eighth => "8ano",
            GradeLevel::Ninth => "9ano",
        }
    }

    /// Short label shown to students, e.g. "6º Ano".
    pub fn label(&self) -> &'static str {
        match self {
            GradeLevel::Sixth => "6º Ano",
            GradeLevel::Seventh => "7º Ano",
            GradeLevel::Eighth => "8º Ano",
            GradeLevel::Ninth => "9º Ano",
        }
    }

    /// Full school-year name used when prompting the generator.
    pub fn curriculum_label(&self) -> String {
        format!("{} do Ensino Fundamental II", self.label())
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Topic selection for a quiz run: every category, or exactly one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum TopicFilter {
    #[default]
    All,
    Category(String),
}

impl TopicFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Category(c) => c == category,
        }
    }
}

impl From<String> for TopicFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            TopicFilter::All
        } else {
            TopicFilter::Category(trimmed.to_string())
        }
    }
}

impl From<TopicFilter> for String {
    fn from(value: TopicFilter) -> Self {
        match value {
            TopicFilter::All => "all".to_string(),
            TopicFilter::Category(c) => c,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_option_index: usize,
    pub category: String,
    pub difficulty: Difficulty,
    pub grade_level: GradeLevel,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Builds a question with a fresh id, rejecting an out-of-range answer index.
    pub fn new(
        text: &str,
        options: [String; OPTION_COUNT],
        correct_option_index: usize,
        category: &str,
        difficulty: Difficulty,
        grade_level: GradeLevel,
    ) -> AppResult<Self> {
        Self::with_id(
            &Uuid::new_v4().to_string(),
            text,
            options,
            correct_option_index,
            category,
            difficulty,
            grade_level,
        )
    }

    pub fn with_id(
        id: &str,
        text: &str,
        options: [String; OPTION_COUNT],
        correct_option_index: usize,
        category: &str,
        difficulty: Difficulty,
        grade_level: GradeLevel,
    ) -> AppResult<Self> {
        if correct_option_index >= OPTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "correctOptionIndex must be below {}, got {}",
                OPTION_COUNT, correct_option_index
            )));
        }
        if text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Question text must not be empty".to_string(),
            ));
        }

        let category = if category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            category.trim()
        };

        Ok(Question {
            id: id.to_string(),
            text: text.trim().to_string(),
            options,
            correct_option_index,
            category: category.to_string(),
            difficulty,
            grade_level,
            created_at: Utc::now(),
        })
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_option_index
    }

    pub fn matches(&self, grade: GradeLevel, topic: &TopicFilter) -> bool {
        self.grade_level == grade && topic.matches(&self.category)
    }
}
