use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use quizboard_core::{GameError, RoundEngine};

use crate::command::{Command, HELP};
use crate::render::render_text;

/// Time source driving the engine's deferred tasks.
pub(crate) trait Clock {
    fn elapsed(&self) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock measured from session start.
pub(crate) struct SystemClock {
    start: web_time::Instant,
}

impl SystemClock {
    pub(crate) fn new() -> Self {
        Self {
            start: web_time::Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

pub(crate) struct Session<C> {
    engine: RoundEngine,
    clock: C,
    format: OutputFormat,
}

impl<C: Clock> Session<C> {
    pub(crate) fn new(engine: RoundEngine, clock: C, format: OutputFormat) -> Self {
        Self {
            engine,
            clock,
            format,
        }
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    /// Reads commands until `quit` or end of input, drawing the board after each one.
    pub(crate) fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        self.draw(&mut output)?;
        for line in input.lines() {
            let line = line?;
            self.tick();

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(output, "error: {:#}", err)?;
                    continue;
                }
            };
            log::debug!("command: {:?}", command);

            match command {
                Command::Quit => break,
                Command::Help => {
                    writeln!(output, "{}", HELP)?;
                    continue;
                }
                command => {
                    if let Some(message) = self.apply(command) {
                        writeln!(output, "error: {}", message)?;
                    }
                }
            }

            self.wait_for_pending();
            self.draw(&mut output)?;
        }
        output.flush()?;
        Ok(())
    }

    /// Runs one command, returning a message for failures the frame does not already show.
    fn apply(&mut self, command: Command) -> Option<String> {
        let result = match command {
            Command::Select { category, level } => self
                .engine
                .select_question(category, level)
                .map(|outcome| log::info!("select {} {}: {:?}", category, level, outcome)),
            Command::Reveal => self.engine.reveal_answer().map(|_| ()),
            Command::Resolve { correct } => self.engine.resolve_answer(correct).map(|resolution| {
                log::info!("{:+} points, score {}", resolution.delta, resolution.score)
            }),
            Command::AddCategory(name) => self
                .engine
                .add_category(&name)
                .map(|outcome| log::info!("add {:?}: {:?}", name, outcome)),
            Command::AddQuestion {
                category,
                value,
                text,
                answer,
            } => self.engine.add_question(category, value, &text, &answer),
            Command::Reset => {
                self.engine.reset_game();
                Ok(())
            }
            Command::Refresh => {
                self.engine.refresh_board();
                Ok(())
            }
            Command::Dismiss => {
                self.engine.dismiss_error();
                Ok(())
            }
            Command::Wait(millis) => {
                self.clock.sleep(Duration::from_millis(millis));
                self.tick();
                Ok(())
            }
            Command::Show => Ok(()),
            Command::Help | Command::Quit => Ok(()),
        };

        match result {
            Ok(()) => None,
            // blank names are ignored, the rest of these are already on the board as notices
            Err(GameError::EmptyName | GameError::InvalidCategory | GameError::DuplicateCategory) => {
                None
            }
            Err(err) => Some(err.to_string()),
        }
    }

    fn tick(&mut self) {
        let fired = self.engine.advance_to(self.clock.elapsed());
        if fired > 0 {
            log::trace!("{} deferred tasks fired", fired);
        }
    }

    /// Blocks until in-flight lookups and category submissions have landed.
    fn wait_for_pending(&mut self) {
        while self.engine.is_loading() || self.engine.is_adding_category() {
            let Some(due) = self.engine.next_due() else {
                break;
            };
            let now = self.clock.elapsed();
            if due > now {
                self.clock.sleep(due - now);
            }
            self.engine.advance_to(due.max(self.clock.elapsed()));
        }
    }

    fn draw(&self, output: &mut impl Write) -> Result<()> {
        let frame = self.engine.frame();
        match self.format {
            OutputFormat::Text => writeln!(output, "{}", render_text(&frame))?,
            OutputFormat::Json => writeln!(output, "{}", serde_json::to_string(&frame)?)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Default)]
    struct ManualClock {
        now: Duration,
    }

    impl Clock for ManualClock {
        fn elapsed(&self) -> Duration {
            self.now
        }

        fn sleep(&mut self, duration: Duration) {
            self.now += duration;
        }
    }

    fn play(script: &str) -> (Session<ManualClock>, String) {
        let mut session = Session::new(
            RoundEngine::standard(),
            ManualClock::default(),
            OutputFormat::Text,
        );
        let mut output = Vec::new();
        session.run(Cursor::new(script), &mut output).unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn full_round_updates_score() {
        let (session, output) = play("select 1 0\nreveal\ncorrect\n");

        assert_eq!(session.engine().score(), 100);
        assert!(output.contains("Answer: What is Nitrogen?"));
        assert!(output.contains("Score: $100"));
        assert_eq!(session.clock.now, Duration::from_millis(500));
    }

    #[test]
    fn missing_question_error_expires_with_time() {
        let (session, output) = play("select 2 4\nwait 3000\n");

        assert!(output.contains("! No question found for history with value $500"));
        assert!(session.engine().error_message().is_none());
    }

    #[test]
    fn failures_outside_the_board_are_printed() {
        let (_, output) = play("reveal\nselect 1 9\nbogus\nadd \n");

        assert!(output.contains("error: No question is being asked"));
        assert!(output.contains("error: Invalid difficulty level 9"));
        assert!(output.contains("error: unknown command"));
        assert_eq!(output.matches("error:").count(), 3);
    }

    #[test]
    fn quit_stops_reading() {
        let (session, _) = play("quit\nselect 1 0\n");

        assert!(session.engine().active_question().is_none());
        assert_eq!(session.engine().pending_tasks(), 0);
    }

    #[test]
    fn json_output_emits_one_frame_per_command() {
        let mut session = Session::new(
            RoundEngine::standard(),
            ManualClock::default(),
            OutputFormat::Json,
        );
        let mut output = Vec::new();
        session
            .run(Cursor::new("add Music\nshow\n"), &mut output)
            .unwrap();

        let frames: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2]["categories"][5]["name"], "Music");
    }
}
