use anyhow::{Context, Result, anyhow, bail};
use quizboard_core::{CategoryId, Points};

/// One line of player input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Select { category: CategoryId, level: u8 },
    Reveal,
    Resolve { correct: bool },
    AddCategory(String),
    AddQuestion {
        category: CategoryId,
        value: Points,
        text: String,
        answer: String,
    },
    Reset,
    Refresh,
    Dismiss,
    Wait(u64),
    Show,
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  select <category-id> <level>        pick a cell, level 0..4
  reveal                              show the answer
  correct | incorrect                 score the active question
  add <name>                          add a category
  question <category-id> <value> <text> | <answer>
                                      add a question
  reset                               clear board and score
  refresh                             clear board, keep score
  dismiss                             clear the error message
  wait <ms>                           let time pass
  show                                redraw the board
  help                                this text
  quit";

impl Command {
    /// Parses a line, `Ok(None)` for blank input.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        let command = match word.to_lowercase().as_str() {
            "select" | "s" => {
                let mut args = rest.split_whitespace();
                let category = parse_arg(args.next(), "category id")?;
                let level = parse_arg(args.next(), "level")?;
                Self::Select { category, level }
            }
            "reveal" | "r" => Self::Reveal,
            "correct" | "y" => Self::Resolve { correct: true },
            "incorrect" | "n" => Self::Resolve { correct: false },
            "add" => Self::AddCategory(rest.to_string()),
            "question" | "q" => Self::parse_question(rest)?,
            "reset" => Self::Reset,
            "refresh" => Self::Refresh,
            "dismiss" => Self::Dismiss,
            "wait" => Self::Wait(parse_arg(rest.split_whitespace().next(), "milliseconds")?),
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {:?}, try `help`", other),
        };
        Ok(Some(command))
    }

    fn parse_question(rest: &str) -> Result<Self> {
        let mut args = rest.splitn(3, char::is_whitespace);
        let category = parse_arg(args.next(), "category id")?;
        let value = parse_arg(args.next(), "value")?;
        let body = args.next().unwrap_or_default();
        let (text, answer) = body
            .split_once('|')
            .ok_or_else(|| anyhow!("expected `<text> | <answer>`"))?;
        Ok(Self::AddQuestion {
            category,
            value,
            text: text.trim().to_string(),
            answer: answer.trim().to_string(),
        })
    }
}

fn parse_arg<T>(arg: Option<&str>, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let arg = arg.ok_or_else(|| anyhow!("missing {}", name))?;
    arg.parse()
        .with_context(|| format!("invalid {} {:?}", name, arg))
}
