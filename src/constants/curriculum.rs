use chrono::Utc;

use crate::models::domain::{Difficulty, GradeLevel, Question};

const SIXTH_TOPICS: [&str; 6] = [
    "Sistema de Numeração Decimal",
    "Operações com Naturais",
    "Frações e Decimais",
    "Geometria Plana e Espacial",
    "Grandezas e Medidas",
    "Probabilidade e Estatística",
];

const SEVENTH_TOPICS: [&str; 6] = [
    "Números Inteiros",
    "Números Racionais",
    "Equações de 1º Grau",
    "Transformações Geométricas",
    "Proporcionalidade e Regra de 3",
    "Médias e Gráficos",
];

const EIGHTH_TOPICS: [&str; 6] = [
    "Potenciação e Radiciação",
    "Notação Científica",
    "Polinômios e Produtos Notáveis",
    "Sistemas de Equações",
    "Geometria e Triângulos",
    "Áreas de Figuras Planas",
];

const NINTH_TOPICS: [&str; 6] = [
    "Números Reais",
    "Equações de 2º Grau",
    "Funções e Gráficos",
    "Teorema de Pitágoras",
    "Trigonometria",
    "Probabilidade e Combinatória",
];

/// BNCC topics offered for a grade, in display order.
pub fn topics_for(grade: GradeLevel) -> &'static [&'static str] {
    match grade {
        GradeLevel::Sixth => &SIXTH_TOPICS,
        GradeLevel::Seventh => &SEVENTH_TOPICS,
        GradeLevel::Eighth => &EIGHTH_TOPICS,
        GradeLevel::Ninth => &NINTH_TOPICS,
    }
}

struct SeedQuestion {
    id: &'static str,
    text: &'static str,
    options: [&'static str; 4],
    correct: usize,
    category: &'static str,
    difficulty: Difficulty,
    grade: GradeLevel,
}

const SEED_QUESTIONS: [SeedQuestion; 12] = [
    SeedQuestion {
        id: "6-easy",
        text: "Qual é o resultado da multiplicação 7 x 8?",
        options: ["54", "56", "48", "64"],
        correct: 1,
        category: "Operações com Naturais",
        difficulty: Difficulty::Easy,
        grade: GradeLevel::Sixth,
    },
    SeedQuestion {
        id: "6-medium",
        text: "Maria tinha 12 balas e deu 1/3 para seu irmão. Quantas balas ela deu?",
        options: ["3", "4", "6", "2"],
        correct: 1,
        category: "Frações e Decimais",
        difficulty: Difficulty::Medium,
        grade: GradeLevel::Sixth,
    },
    SeedQuestion {
        id: "6-hard",
        text: "Quantas faces tem um cubo?",
        options: ["4", "8", "6", "12"],
        correct: 2,
        category: "Geometria Plana e Espacial",
        difficulty: Difficulty::Hard,
        grade: GradeLevel::Sixth,
    },
    SeedQuestion {
        id: "7-easy",
        text: "Qual o resultado de: -5 + 8?",
        options: ["-3", "-13", "3", "13"],
        correct: 2,
        category: "Números Inteiros",
        difficulty: Difficulty::Easy,
        grade: GradeLevel::Seventh,
    },
    SeedQuestion {
        id: "7-medium",
        text: "Resolva a equação: 2x + 10 = 20",
        options: ["5", "10", "2", "15"],
        correct: 0,
        category: "Equações de 1º Grau",
        difficulty: Difficulty::Medium,
        grade: GradeLevel::Seventh,
    },
    SeedQuestion {
        id: "7-hard",
        text: "Se 3 quilos de ração custam R$ 15,00, quanto custam 7 quilos?",
        options: ["R$ 30,00", "R$ 45,00", "R$ 35,00", "R$ 25,00"],
        correct: 2,
        category: "Proporcionalidade e Regra de 3",
        difficulty: Difficulty::Hard,
        grade: GradeLevel::Seventh,
    },
    SeedQuestion {
        id: "8-easy",
        text: "Qual a soma dos ângulos internos de um triângulo?",
        options: ["180°", "360°", "90°", "270°"],
        correct: 0,
        category: "Geometria e Triângulos",
        difficulty: Difficulty::Easy,
        grade: GradeLevel::Eighth,
    },
    SeedQuestion {
        id: "8-medium",
        text: "Simplifique a expressão algébrica: 2a + 3b + 5a - b",
        options: ["7a + 2b", "7a + 4b", "10ab", "7a - 2b"],
        correct: 0,
        category: "Polinômios e Produtos Notáveis",
        difficulty: Difficulty::Medium,
        grade: GradeLevel::Eighth,
    },
    SeedQuestion {
        id: "8-hard",
        text: "Qual é a área de um círculo com raio de 5cm? (Considere π = 3)",
        options: ["15 cm²", "25 cm²", "75 cm²", "30 cm²"],
        correct: 2,
        category: "Áreas de Figuras Planas",
        difficulty: Difficulty::Hard,
        grade: GradeLevel::Eighth,
    },
    SeedQuestion {
        id: "9-easy",
        text: "Como se escreve 0,0004 em notação científica?",
        options: ["4 x 10⁻³", "4 x 10⁻⁴", "4 x 10³", "4 x 10⁴"],
        correct: 1,
        category: "Números Reais",
        difficulty: Difficulty::Easy,
        grade: GradeLevel::Ninth,
    },
    SeedQuestion {
        id: "9-medium",
        text: "Em um triângulo retângulo, catetos medem 3 e 4. A hipotenusa mede:",
        options: ["5", "6", "7", "8"],
        correct: 0,
        category: "Teorema de Pitágoras",
        difficulty: Difficulty::Medium,
        grade: GradeLevel::Ninth,
    },
    SeedQuestion {
        id: "9-hard",
        text: "Quantas raízes reais tem a equação x² - 4x + 4 = 0?",
        options: ["Nenhuma", "Duas distintas", "Uma única (real)", "Três"],
        correct: 2,
        category: "Equações de 2º Grau",
        difficulty: Difficulty::Hard,
        grade: GradeLevel::Ninth,
    },
];

/// The built-in question bank written to an empty store on first access.
pub fn default_questions() -> Vec<Question> {
    let now = Utc::now();
    SEED_QUESTIONS
        .iter()
        .map(|seed| Question {
            id: seed.id.to_string(),
            text: seed.text.to_string(),
            options: seed.options.map(String::from),
            correct_option_index: seed.correct,
            category: seed.category.to_string(),
            difficulty: seed.difficulty,
            grade_level: seed.grade,
            created_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::domain::question::OPTION_COUNT;

    #[test]
    fn every_grade_has_six_topics() {
        for grade in GradeLevel::ALL {
            assert_eq!(topics_for(grade).len(), 6, "grade {}", grade);
        }
    }

    #[test]
    fn seed_set_has_easy_medium_hard_per_grade() {
        let questions = default_questions();
        assert_eq!(questions.len(), 12);

        for grade in GradeLevel::ALL {
            let difficulties: HashSet<Difficulty> = questions
                .iter()
                .filter(|q| q.grade_level == grade)
                .map(|q| q.difficulty)
                .collect();
            assert_eq!(difficulties.len(), 3, "grade {}", grade);
        }
    }

    #[test]
    fn seed_questions_satisfy_option_invariants() {
        for q in default_questions() {
            assert_eq!(q.options.len(), OPTION_COUNT);
            assert!(q.correct_option_index < q.options.len(), "{}", q.id);
        }
    }

    #[test]
    fn seed_categories_come_from_the_grade_topics() {
        for q in default_questions() {
            assert!(
                topics_for(q.grade_level).contains(&q.category.as_str()),
                "{} has unknown category {}",
                q.id,
                q.category
            );
        }
    }
}
