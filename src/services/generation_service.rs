use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    constants::question_prompt::{question_request_prompt, QUESTION_GENERATOR_PROMPT},
    errors::{AppError, AppResult, GenerationError},
    models::{
        domain::{question::OPTION_COUNT, Difficulty, GradeLevel, Question},
        dto::request::GenerateQuestionRequest,
    },
    services::question_service::QuestionService,
};

/// The JSON object the generator must return.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    /// The question statement
    pub text: String,
    /// Exactly 4 answer alternatives
    pub options: Vec<String>,
    /// Zero-based index (0-3) of the correct alternative in `options`
    pub correct_option_index: i64,
    /// Short curriculum category, e.g. Geometria or Álgebra
    pub category: String,
}

static GENERATED_QUESTION_SCHEMA: Lazy<serde_json::Value> = Lazy::new(|| {
    serde_json::to_value(schemars::schema_for!(GeneratedQuestion)).unwrap_or_default()
});

impl GeneratedQuestion {
    /// Checks the payload and wraps it into a stored question carrying the
    /// requested grade and difficulty.
    pub fn into_question(
        self,
        request: &GenerateQuestionRequest,
    ) -> Result<Question, GenerationError> {
        if self.text.trim().is_empty() {
            return Err(GenerationError::InvalidQuestion(
                "question text is empty".to_string(),
            ));
        }

        let option_count = self.options.len();
        let options: [String; OPTION_COUNT] = self.options.try_into().map_err(|_| {
            GenerationError::InvalidQuestion(format!(
                "expected {} options, got {}",
                OPTION_COUNT, option_count
            ))
        })?;
        if options.iter().any(|o| o.trim().is_empty()) {
            return Err(GenerationError::InvalidQuestion(
                "an option is empty".to_string(),
            ));
        }

        let correct_option_index = usize::try_from(self.correct_option_index)
            .ok()
            .filter(|i| *i < OPTION_COUNT)
            .ok_or_else(|| {
                GenerationError::InvalidQuestion(format!(
                    "correctOptionIndex {} is out of range",
                    self.correct_option_index
                ))
            })?;

        let category = if self.category.trim().is_empty() {
            request.topic.trim()
        } else {
            self.category.trim()
        };

        Question::new(
            &self.text,
            options,
            correct_option_index,
            category,
            request.difficulty,
            request.grade_level,
        )
        .map_err(|e| GenerationError::InvalidQuestion(e.to_string()))
    }
}

pub fn parse_generated_question(content: &str) -> Result<GeneratedQuestion, GenerationError> {
    serde_json::from_str(content).map_err(|e| GenerationError::MalformedResponse(e.to_string()))
}

/// External question-writing service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        topic: &str,
        difficulty: Difficulty,
        grade: GradeLevel,
    ) -> Result<GeneratedQuestion, GenerationError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions generator using a JSON-schema
/// response format.
pub struct OpenAiQuestionGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQuestionGenerator {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.openai_api_key.expose_secret())
            .with_api_base(&config.openai_api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.openai_model.clone(),
        }
    }

    fn request_body(&self, topic: &str, difficulty: Difficulty, grade: GradeLevel) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": QUESTION_GENERATOR_PROMPT },
                { "role": "user", "content": question_request_prompt(topic, difficulty, grade) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "generated_question",
                    "schema": &*GENERATED_QUESTION_SCHEMA
                }
            }
        })
    }
}

#[async_trait]
impl QuestionGenerator for OpenAiQuestionGenerator {
    async fn generate(
        &self,
        topic: &str,
        difficulty: Difficulty,
        grade: GradeLevel,
    ) -> Result<GeneratedQuestion, GenerationError> {
        let request = self.request_body(topic, difficulty, grade);

        let response: ChatCompletion = self
            .client
            .chat()
            .create_byot(request)
            .await
            .map_err(|e| GenerationError::Service(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        parse_generated_question(&content)
    }
}

/// Clears the busy flag when a generation request ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct GenerationService {
    generator: Arc<dyn QuestionGenerator>,
    question_service: Arc<QuestionService>,
    in_flight: AtomicBool,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn QuestionGenerator>, question_service: Arc<QuestionService>) -> Self {
        Self {
            generator,
            question_service,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Asks the generator for one question and stores it. Only one request
    /// runs at a time; no retries.
    pub async fn generate_question(&self, request: GenerateQuestionRequest) -> AppResult<Question> {
        request.validate()?;

        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(AppError::Busy(
                "A question is already being generated".to_string(),
            ));
        }
        let _in_flight = InFlight(&self.in_flight);

        let generated = self
            .generator
            .generate(request.topic.trim(), request.difficulty, request.grade_level)
            .await
            .and_then(|g| g.into_question(&request));

        match generated {
            Ok(question) => {
                log::info!(
                    "Generated question for {} / '{}' ({})",
                    request.grade_level,
                    request.topic,
                    request.difficulty
                );
                self.question_service.add_question(question).await
            }
            Err(e) => {
                log::error!("Question generation failed: {}", e);
                Err(e.into())
            }
        }
    }
}
