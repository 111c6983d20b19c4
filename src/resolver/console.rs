use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Stdin, Stdout, Write};

use super::decision::{Decision, DecisionProvider, Prompt};

const REJECT_LABEL: &str = "✗ None of these";
const REJECT_ALL_LABEL: &str = "✗ None of these, reject all remaining";

/// Numbered terminal menu
pub struct ConsoleProvider<R, W> {
    input: R,
    output: W,
}

impl ConsoleProvider<io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn render(&mut self, prompt: &Prompt<'_>) -> Result<usize> {
        writeln!(
            self.output,
            "Which of these is =>[{}]<=? (rank {})",
            prompt.record_name.bold(),
            prompt.rank
        )?;

        for (idx, candidate) in prompt.candidates.iter().enumerate() {
            if candidate.also_record_name {
                writeln!(
                    self.output,
                    "  {}) {} {}",
                    idx + 1,
                    candidate.name,
                    "(!) also a record name".yellow()
                )?;
            } else {
                writeln!(self.output, "  {}) {}", idx + 1, candidate.name)?;
            }
        }

        let reject = prompt.candidates.len() + 1;
        writeln!(self.output, "  {}) {}", reject, REJECT_LABEL.red())?;
        writeln!(self.output, "  {}) {}", reject + 1, REJECT_ALL_LABEL.red())?;
        Ok(reject + 1)
    }

    fn read_choice(&mut self, max: usize) -> Result<Option<usize>> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("Failed to read operator input")?;
            if read == 0 {
                return Ok(None);
            }

            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=max).contains(&choice) => return Ok(Some(choice)),
                _ => writeln!(self.output, "Please enter a number between 1 and {}", max)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> DecisionProvider for ConsoleProvider<R, W> {
    fn decide(&mut self, prompt: &Prompt<'_>) -> Result<Decision> {
        let max = self.render(prompt)?;

        // Closed input cannot answer the remaining prompts either
        let Some(choice) = self.read_choice(max)? else {
            return Ok(Decision::RejectAll);
        };

        let decision = match prompt.candidates.get(choice - 1) {
            Some(candidate) => Decision::Accept(candidate.name.clone()),
            None if choice == max => Decision::RejectAll,
            None => Decision::Reject,
        };
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Candidate;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate {
                name: "jane q doe".to_string(),
                shared_words: 2,
                also_record_name: false,
            },
            Candidate {
                name: "john doe".to_string(),
                shared_words: 1,
                also_record_name: true,
            },
        ]
    }

    fn decide(input: &str) -> (Decision, String) {
        colored::control::set_override(false);
        let candidates = candidates();
        let prompt = Prompt {
            rank: 4,
            record_name: "jane doe",
            candidates: &candidates,
        };
        let mut output = Vec::new();
        let decision = ConsoleProvider::new(input.as_bytes(), &mut output)
            .decide(&prompt)
            .unwrap();
        (decision, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_menu_choices_map_to_decisions() {
        assert_eq!(decide("2\n").0, Decision::Accept("john doe".to_string()));
        assert_eq!(decide("3\n").0, Decision::Reject);
        assert_eq!(decide("4\n").0, Decision::RejectAll);
    }

    #[test]
    fn test_invalid_input_reprompts_and_eof_rejects_all() {
        let (decision, output) = decide("9\nabc\n1\n");
        assert_eq!(decision, Decision::Accept("jane q doe".to_string()));
        assert_eq!(output.matches("Please enter a number between 1 and 4").count(), 2);

        assert_eq!(decide("").0, Decision::RejectAll);
    }

    #[test]
    fn test_menu_marks_record_name_guesses() {
        let (_, output) = decide("1\n");
        assert!(output.contains("Which of these is =>[jane doe]<=? (rank 4)"));
        assert!(output.contains("2) john doe (!) also a record name"));
        assert!(output.contains("3) ✗ None of these"));
    }
}
