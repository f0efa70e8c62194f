use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::question::OPTION_COUNT;
use crate::models::domain::{Difficulty, GradeLevel, TopicFilter};

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be blank"));
        return Err(err);
    }
    Ok(())
}

fn all_options_filled(options: &[String]) -> Result<(), ValidationError> {
    if options.iter().any(|o| o.trim().is_empty()) {
        let mut err = ValidationError::new("blank_option");
        err.message = Some(Cow::from("every option must be filled in"));
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[validate(custom(function = "non_blank"), length(max = 100))]
    pub student_name: String,

    #[validate(required(message = "a grade level must be selected"))]
    pub grade_level: Option<GradeLevel>,

    #[serde(default)]
    pub topic: TopicFilter,

    /// Fixes the question order; a random seed is drawn when absent.
    /// Must be below 2^53.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub option_index: usize,

    /// Negative or non-finite values are recorded as 0.
    #[serde(default)]
    pub time_spent_seconds: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(custom(function = "non_blank"), length(max = 1000))]
    pub text: String,

    #[validate(length(equal = 4), custom(function = "all_options_filled"))]
    pub options: Vec<String>,

    #[validate(range(max = 3))]
    pub correct_option_index: usize,

    pub grade_level: GradeLevel,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl CreateQuestionRequest {
    /// The four options as a fixed array, once `validate` has passed.
    pub fn option_array(&self) -> Option<[String; OPTION_COUNT]> {
        self.options.clone().try_into().ok()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionRequest {
    #[validate(custom(function = "non_blank"), length(max = 200))]
    pub topic: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    pub grade_level: GradeLevel,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListParams {
    pub grade_level: Option<GradeLevel>,
    #[serde(default)]
    pub topic: TopicFilter,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    pub grade_level: Option<GradeLevel>,
}
