use anyhow::Result;

use elo_console::cli::{Cli, Command};
use elo_console::config::AppConfig;
use elo_console::{
    handle_add_player, handle_candidates, handle_completions, handle_login, handle_players,
    handle_record_match, handle_show, handle_status, interpret, load_config,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    let config = load_config(&cli);
    execute_command(&cli, &config)
}

fn execute_command(cli: &Cli, config: &AppConfig) -> Result<()> {
    let command = cli.command.clone().unwrap_or(Command::Show);
    match &command {
        Command::Show => handle_show(config),
        Command::Status => handle_status(config),
        Command::Players => handle_players(config),
        Command::Login { username, password } => {
            handle_login(config, username, password.as_deref())
        }
        Command::AddPlayer { name } => handle_add_player(config, name),
        Command::RecordMatch { winner, loser } => handle_record_match(config, winner, loser),
        Command::Candidates { winner, loser } => {
            handle_candidates(config, winner.as_deref(), loser.as_deref())
        }
        Command::Completions { shell } => handle_completions(*shell),
    }
}
