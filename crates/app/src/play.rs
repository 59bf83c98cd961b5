use std::io::{self, BufRead, Write};
use std::sync::Arc;

use quiz_core::model::{AnswerFeedback, GroupCatalog, GroupId, OptionId, QuestionLimit};
use services::{
    QuestionView, QuizDriver, QuizError, QuizEvent, QuizLoopService, QuizPhase, QuizPresenter,
    QuizResult,
};

/// Prints quiz screens to stdout and remembers the options on display.
#[derive(Debug, Default)]
struct TerminalPresenter {
    options: Vec<OptionId>,
}

impl TerminalPresenter {
    fn option_at(&self, number: usize) -> Option<OptionId> {
        number
            .checked_sub(1)
            .and_then(|index| self.options.get(index).copied())
    }

    fn number_of(&self, id: OptionId) -> usize {
        self.options
            .iter()
            .position(|option| *option == id)
            .map_or(0, |index| index + 1)
    }
}

impl QuizPresenter for TerminalPresenter {
    fn present(&mut self, question: &QuestionView) {
        println!();
        println!("{}    Score: {}", question.progress_label(), question.score);
        println!("{}", question.prompt);
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}) {}", index + 1, option.text);
        }
        self.options = question.options.iter().map(|option| option.id).collect();
    }

    fn reveal(&mut self, feedback: &AnswerFeedback) {
        if feedback.is_correct {
            println!("Correct!");
        } else {
            println!("Wrong. The answer is {}.", self.number_of(feedback.correct));
        }
    }

    fn complete(&mut self, result: &QuizResult) {
        println!();
        println!("Test Completed! Your Score: {} / {}", result.score, result.total);
    }

    fn report(&mut self, error: &QuizError) {
        println!("! {error}");
    }
}

enum Command {
    Answer(usize),
    Next,
    Restart,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "n" | "next" => Some(Command::Next),
        "r" | "restart" => Some(Command::Restart),
        "q" | "quit" => Some(Command::Quit),
        other => other.parse().ok().map(Command::Answer),
    }
}

/// Group numbers (1-based, comma separated) or `all`, resolved in catalog order.
fn parse_groups(line: &str, catalog: &GroupCatalog) -> Vec<GroupId> {
    if line.trim().eq_ignore_ascii_case("all") {
        return catalog.ids().cloned().collect();
    }
    let mut picked: Vec<usize> = line
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|n| (1..=catalog.len()).contains(n))
        .collect();
    picked.sort_unstable();
    picked.dedup();
    picked
        .into_iter()
        .map(|n| catalog.groups()[n - 1].source_id().clone())
        .collect()
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> io::Result<Option<String>> {
    print!("{text} ");
    io::stdout().flush()?;
    lines.next().transpose()
}

fn prompt_groups(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    catalog: &GroupCatalog,
) -> io::Result<Option<Vec<GroupId>>> {
    println!();
    println!("Select Categories");
    for (index, group) in catalog.groups().iter().enumerate() {
        println!("  {}) {}", index + 1, group.display_name());
    }
    let line = prompt(lines, "groups (e.g. 1,3 or all):")?;
    Ok(line.map(|line| parse_groups(&line, catalog)))
}

/// Run a quiz on the terminal until the user quits or input ends.
///
/// A saved session is resumed first; `groups` seeds the first start when
/// non-empty, otherwise the user is asked.
pub async fn run(
    quiz_loop: Arc<QuizLoopService>,
    catalog: &GroupCatalog,
    groups: Vec<GroupId>,
    limit: QuestionLimit,
) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut driver = QuizDriver::new(quiz_loop, TerminalPresenter::default());
    let mut preset = Some(groups).filter(|groups| !groups.is_empty());

    let mut phase = driver.resume().await;
    loop {
        phase = match phase {
            QuizPhase::Idle | QuizPhase::Loading => {
                let groups = match preset.take() {
                    Some(groups) => groups,
                    None => match prompt_groups(&mut lines, catalog)? {
                        Some(groups) => groups,
                        None => return Ok(()),
                    },
                };
                driver.start(&groups, limit).await
            }
            QuizPhase::InProgress => {
                let Some(line) = prompt(&mut lines, "[number] answer, n next, r restart, q quit:")?
                else {
                    return Ok(());
                };
                match parse_command(&line) {
                    Some(Command::Answer(number)) => match driver.presenter().option_at(number) {
                        Some(option) => driver.handle(QuizEvent::AnswerSelected(option)).await,
                        None => {
                            println!("! no option {number}");
                            phase
                        }
                    },
                    Some(Command::Next) => driver.handle(QuizEvent::Advance).await,
                    Some(Command::Restart) => driver.handle(QuizEvent::Restart).await,
                    Some(Command::Quit) => return Ok(()),
                    None => phase,
                }
            }
            QuizPhase::Completed => {
                let Some(line) = prompt(&mut lines, "r restart, q quit:")? else {
                    return Ok(());
                };
                match parse_command(&line) {
                    Some(Command::Restart) => driver.handle(QuizEvent::Restart).await,
                    Some(Command::Quit) => return Ok(()),
                    _ => phase,
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Group;

    fn catalog() -> GroupCatalog {
        GroupCatalog::new(vec![
            Group::new("A", "a.json").unwrap(),
            Group::new("B", "b.json").unwrap(),
            Group::new("C", "c.json").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn group_numbers_resolve_in_catalog_order() {
        let picked = parse_groups("3, 1, 3, 9", &catalog());
        assert_eq!(picked, vec![GroupId::new("a.json"), GroupId::new("c.json")]);
    }

    #[test]
    fn all_selects_every_group() {
        assert_eq!(parse_groups("ALL", &catalog()).len(), 3);
    }

    #[test]
    fn option_numbers_are_one_based() {
        let presenter = TerminalPresenter {
            options: vec![OptionId::new(0), OptionId::new(1)],
        };
        assert_eq!(presenter.option_at(1), Some(OptionId::new(0)));
        assert_eq!(presenter.option_at(0), None);
        assert_eq!(presenter.number_of(OptionId::new(1)), 2);
    }
}
