use serde::Deserialize;

/// A single quiz question with its answer options.
///
/// Mirrors the wire shape of the quiz API (camelCase field names). The
/// question sequence for an attempt is immutable once fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, unique within one quiz.
    pub id: u64,
    /// Prompt shown to the player.
    pub question_text: String,
    /// The one correct answer.
    pub correct_answer: String,
    /// Distractors shown alongside the correct answer.
    pub incorrect_answers: Vec<String>,
}

impl Question {
    /// All answer options in display order.
    ///
    /// The API lists distractors separately from the correct answer; options
    /// are sorted lexicographically for a stable display order.
    pub fn options(&self) -> Vec<String> {
        let mut options = self.incorrect_answers.clone();
        options.push(self.correct_answer.clone());
        options.sort();
        options
    }

    /// Whether `answer` matches the correct answer exactly.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_contain_correct_answer_in_sorted_order() {
        let question = Question {
            id: 1,
            question_text: "Largest planet?".to_string(),
            correct_answer: "Jupiter".to_string(),
            incorrect_answers: vec![
                "Saturn".to_string(),
                "Earth".to_string(),
                "Neptune".to_string(),
            ],
        };

        let options = question.options();
        assert_eq!(options, vec!["Earth", "Jupiter", "Neptune", "Saturn"]);
        assert!(question.is_correct("Jupiter"));
        assert!(!question.is_correct("Saturn"));
        assert!(!question.is_correct("jupiter"));
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{
            "id": 12,
            "questionText": "2 + 2?",
            "correctAnswer": "4",
            "incorrectAnswers": ["3", "5", "22"]
        }"#;

        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.id, 12);
        assert_eq!(question.question_text, "2 + 2?");
        assert_eq!(question.correct_answer, "4");
        assert_eq!(question.incorrect_answers.len(), 3);
    }
}
