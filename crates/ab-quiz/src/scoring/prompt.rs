use std::fmt::Write as _;

use super::domain::{CharacteristicPair, Question};
use super::error::ValidationError;

/// Scoring instruction ready to send, plus the pairs the normalizer must balance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    pub instruction: String,
    pub pairs: Vec<CharacteristicPair>,
}

/// Build the user instruction asking the model for one JSON object of paired scores.
///
/// The text depends only on the inputs, so identical requests produce identical prompts.
pub fn build<A, C>(
    questions: &[Question],
    answers: &[A],
    characteristics: &[C],
) -> Result<ScoreRequest, ValidationError>
where
    A: AsRef<str>,
    C: AsRef<str>,
{
    if answers.len() != questions.len() {
        return Err(ValidationError::LengthMismatch {
            questions: questions.len(),
            answers: answers.len(),
        });
    }
    let pairs = CharacteristicPair::parse_all(characteristics)?;

    let mut instruction = String::from(
        "Analyze all of the answers below collectively, as one profile of the person who gave \
         them, and score each characteristic pair. Return only a JSON object, with no \
         commentary, explanation, or code fences.\n",
    );

    instruction.push_str("\nQuestions and answers:\n");
    for (index, (question, answer)) in questions.iter().zip(answers).enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(
            instruction,
            "{}. Q: {} / A: {}",
            index + 1,
            single_line(&question.text),
            single_line(answer.as_ref())
        );
    }

    instruction.push_str("\nCharacteristic pairs:\n");
    for pair in &pairs {
        let _ = writeln!(instruction, "- {}", pair.name());
    }

    instruction.push_str(
        "\nUse both labels of every pair as keys, spelled exactly as listed above. Each score \
         must be a number with exactly one decimal digit, and the two scores of each pair must \
         sum to exactly 100.0.\n",
    );
    if let Some(first) = pairs.first() {
        let _ = write!(
            instruction,
            "Format for the first pair: {{\"{}\": <score>, \"{}\": <score>}}",
            first.left(),
            first.right()
        );
    }

    Ok(ScoreRequest { instruction, pairs })
}

/// Keeps each question/answer on its own line.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::new(
                "1",
                "Would you rather work alone or in a team?",
                "alone",
                "in a team",
            ),
            Question::new(
                "2",
                "Would you rather plan ahead or improvise?",
                "plan ahead",
                "improvise",
            ),
        ]
    }

    #[test]
    fn build_is_deterministic() {
        let answers = ["in a team", "plan ahead"];
        let characteristics = ["Independent vs Collaborative", "Flexible vs Structured"];

        let first = build(&questions(), &answers, &characteristics).expect("valid request");
        let second = build(&questions(), &answers, &characteristics).expect("valid request");
        assert_eq!(first.instruction, second.instruction);
    }

    #[test]
    fn instruction_lists_sections_in_order() {
        let answers = ["in a team", "No answer"];
        let characteristics = ["Independent vs Collaborative", "Flexible vs Structured"];
        let request = build(&questions(), &answers, &characteristics).expect("valid request");
        let text = &request.instruction;

        let directive = text.find("Return only a JSON object").expect("directive");
        let first_line = text
            .find("1. Q: Would you rather work alone or in a team? / A: in a team")
            .expect("first q/a line");
        let second_line = text
            .find("2. Q: Would you rather plan ahead or improvise? / A: No answer")
            .expect("second q/a line");
        let first_pair = text.find("- Independent vs Collaborative").expect("first pair");
        let second_pair = text.find("- Flexible vs Structured").expect("second pair");
        let format = text.find("exactly one decimal digit").expect("format rule");

        assert!(directive < first_line);
        assert!(first_line < second_line);
        assert!(second_line < first_pair);
        assert!(first_pair < second_pair);
        assert!(second_pair < format);
        assert!(text.contains("sum to exactly 100.0"));
    }

    #[test]
    fn format_hint_carries_no_sample_scores() {
        let request = build(&questions(), &["alone", "plan ahead"], &["Cautious vs Bold"])
            .expect("valid request");
        assert!(request
            .instruction
            .contains(r#"{"Cautious": <score>, "Bold": <score>}"#));
        assert!(!request.instruction.contains("35.0"));
    }

    #[test]
    fn multiline_text_stays_on_one_line() {
        let questions = [Question::new(
            "1",
            "Would you rather\nwork alone\r\nor in a team?",
            "alone",
            "in a team",
        )];
        let request = build(&questions, &["in a team,\nmostly"], &["Cautious vs Bold"])
            .expect("valid request");
        assert!(request
            .instruction
            .contains("1. Q: Would you rather work alone or in a team? / A: in a team, mostly\n"));
    }

    #[test]
    fn rejects_answer_count_mismatch() {
        let mut three = questions();
        three.push(Question::new("3", "Would you rather read or listen?", "read", "listen"));

        let err = build(&three, &["alone", "plan ahead"], &["Independent vs Collaborative"])
            .expect_err("mismatch rejected");
        assert_eq!(
            err,
            ValidationError::LengthMismatch {
                questions: 3,
                answers: 2
            }
        );
    }

    #[test]
    fn rejects_empty_characteristics() {
        let no_pairs: [&str; 0] = [];
        let answers: [&str; 0] = [];
        let err = build(&[], &answers, &no_pairs).expect_err("empty characteristics rejected");
        assert_eq!(err, ValidationError::NoCharacteristics);
    }

    #[test]
    fn returns_parsed_pairs_in_request_order() {
        let request = build(
            &questions(),
            &["alone", "improvise"],
            &["Flexible vs Structured", "Independent vs Collaborative"],
        )
        .expect("valid request");
        let names: Vec<_> = request.pairs.iter().map(|pair| pair.name()).collect();
        assert_eq!(names, ["Flexible vs Structured", "Independent vs Collaborative"]);
    }
}
