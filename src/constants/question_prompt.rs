use crate::models::domain::{Difficulty, GradeLevel};

pub const QUESTION_GENERATOR_PROMPT: &str = "You are a mathematics question writer for Brazilian middle-school students (Ensino Fundamental II). You write multiple-choice questions in Brazilian Portuguese that follow the BNCC (Base Nacional Comum Curricular) for the requested school year.

### Output Specifications:

- **text:** The question statement, self-contained and unambiguous.
- **options:** Exactly 4 answer alternatives. Exactly one is correct; the other three are plausible mistakes a student of that year could make.
- **correctOptionIndex:** The zero-based index (0-3) of the correct alternative inside `options`.
- **category:** A short curriculum category for the question (for example: Geometria, Álgebra, Frações e Decimais).

### Accuracy Requirements:

- Verify the arithmetic of the correct alternative before answering.
- Never repeat the same value in two alternatives.
- Keep the difficulty consistent with the requested level: easy questions need one step, medium two or three, hard questions combine concepts.

Respond only with the JSON object described by the schema. Do not add commentary.";

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "fácil",
        Difficulty::Medium => "médio",
        Difficulty::Hard => "difícil",
    }
}

/// User message for a single generation request.
pub fn question_request_prompt(topic: &str, difficulty: Difficulty, grade: GradeLevel) -> String {
    format!(
        "Gere uma pergunta de matemática de múltipla escolha para alunos do {}.\n\
         Tópico: \"{}\".\n\
         Nível de dificuldade: {}.\n\
         Certifique-se de que o assunto é adequado à BNCC para este ano escolar.",
        grade.curriculum_label(),
        topic,
        difficulty_label(difficulty)
    )
}
