use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "elo-calculator admin console")]
pub struct Cli {
    /// Elo service base URL (overrides ELO_CONSOLE_URL)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Command (defaults to `show`)
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show controls, standings and match history
    Show,
    /// Check whether the stored credential is accepted
    Status,
    /// List the current roster
    Players,
    /// Exchange a username and password for a stored token
    Login {
        #[arg(short, long, default_value = "admin")]
        username: String,
        /// Prompted for when neither the flag nor ELO_CONSOLE_PASSWORD is set
        #[arg(short, long, env = "ELO_CONSOLE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Register a new player
    AddPlayer {
        /// Player name; words are capitalized and joined
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Record the outcome of a match
    RecordMatch {
        #[arg(short, long, required = true, num_args = 1..)]
        winner: Vec<String>,
        #[arg(short, long, required = true, num_args = 1..)]
        loser: Vec<String>,
    },
    /// Show the selectable winners and losers for a partial selection
    Candidates {
        #[arg(short, long, num_args = 1..)]
        winner: Option<Vec<String>>,
        #[arg(short, long, num_args = 1..)]
        loser: Option<Vec<String>>,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_multi_word_names() {
        let cli = Cli::parse_from([
            "elo_console", "record-match", "--winner", "john", "smith", "--loser", "ann",
        ]);

        assert_eq!(
            cli.command,
            Some(Command::RecordMatch {
                winner: vec!["john".into(), "smith".into()],
                loser: vec!["ann".into()],
            })
        );
    }

    #[test]
    fn test_global_host() {
        let cli = Cli::parse_from(["elo_console", "players", "--host", "http://10.0.0.2:8000"]);

        assert_eq!(cli.host.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(cli.command, Some(Command::Players));
    }

    #[test]
    fn test_login_password_is_optional() {
        let cli = Cli::parse_from(["elo_console", "login", "-u", "root", "-p", "pw"]);
        assert_eq!(
            cli.command,
            Some(Command::Login {
                username: "root".into(),
                password: Some("pw".into()),
            })
        );

        assert!(Cli::try_parse_from(["elo_console", "login"]).is_ok());
    }

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["elo_console"]);
        assert_eq!(cli.command, None);
    }
}
