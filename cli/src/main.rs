use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use config::Settings;
use session::{OutputFormat, Session, SystemClock};

mod command;
mod config;
mod render;
mod session;

/// Single-player trivia board played from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file with delays, categories and extra questions
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the simulated lookup and add-category latency
    #[arg(long)]
    instant: bool,

    /// Print every frame as a JSON line instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.instant {
        settings.game = settings.game.without_latency();
    }
    log::debug!("settings: {:?}", settings.game);

    let engine = settings.build_engine()?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut session = Session::new(engine, SystemClock::new(), format);
    session.run(std::io::stdin().lock(), std::io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_flags() {
        let args = Args::try_parse_from(["quizboard", "-vv", "--instant", "--config", "board.toml"])
            .unwrap();

        assert!(args.instant);
        assert!(!args.json);
        assert_eq!(args.config, Some(PathBuf::from("board.toml")));
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }
}
