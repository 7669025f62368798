mod config;
mod transcript;

use clap::Parser;
use config::{ConfigError, MatchConfig};
use match_referee::{
    FirstMoveProposer, Proposer, RandomProposer, ScriptedProposer, TurnArbiter, Winner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "match-runner")]
#[command(about = "Runs a chess game between two autonomous move proposers")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "match.toml")]
    config: PathBuf,
    /// Maximum number of plies before the game is cut off
    #[arg(short, long)]
    turns: Option<i64>,
    /// Maximum proposals per ply before the turn is forfeited
    #[arg(short, long)]
    retries: Option<i64>,
    /// Strategy for the white proposer: first, random or script:<path>
    #[arg(long)]
    white: Option<String>,
    /// Strategy for the black proposer: first, random or script:<path>
    #[arg(long)]
    black: Option<String>,
    /// Directory for PGN and JSON transcripts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ConfigError> {
    let mut config = MatchConfig::load(&cli.config)?;
    if let Some(turns) = cli.turns {
        config.game.max_turns = turns;
    }
    if let Some(retries) = cli.retries {
        config.game.max_nested_turns = retries;
    }
    if let Some(white) = cli.white {
        config.white.strategy = white;
    }
    if let Some(black) = cli.black {
        config.black.strategy = black;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let limits = config.limits()?;
    let white = build_proposer("white", &config.white.strategy)?;
    let black = build_proposer("black", &config.black.strategy)?;

    let mut arbiter = TurnArbiter::new(white, black, limits)?;
    let report = arbiter.run();

    println!("Game over: {}", report.status);
    match report.winner {
        Winner::White => println!("White wins!"),
        Winner::Black => println!("Black wins!"),
        Winner::Draw => println!("The game is a draw."),
        Winner::Undecided => println!("No winner ({:?}).", report.completion),
    }
    println!("Final position: {}", report.final_fen);
    println!(
        "Plies played: {} ({} forfeited)",
        report.plies_played, report.forfeited_plies
    );

    std::fs::create_dir_all(&config.output_dir)?;
    let id = uuid::Uuid::new_v4().to_string();
    let pgn_path = config.output_dir.join(format!("{id}.pgn"));
    let json_path = config.output_dir.join(format!("{id}.json"));
    transcript::write_pgn(&pgn_path, &report)?;
    transcript::write_json(&json_path, &id, &report)?;
    info!(pgn = %pgn_path.display(), json = %json_path.display(), "transcripts written");
    Ok(())
}

fn build_proposer(name: &str, strategy: &str) -> Result<Box<dyn Proposer>, ConfigError> {
    match strategy {
        "first" => Ok(Box::new(FirstMoveProposer::new(name))),
        "random" => Ok(Box::new(RandomProposer::new(name))),
        script if script.starts_with("script:") => {
            let path = &script["script:".len()..];
            let text = std::fs::read_to_string(path)?;
            let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            Ok(Box::new(ScriptedProposer::new(name, tokens)))
        }
        other => Err(ConfigError::UnknownStrategy(other.to_string())),
    }
}
