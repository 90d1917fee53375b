pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod services;
pub mod session;
pub mod storage;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use cli::Cli;

use crate::api::EloApiClient;
use crate::config::settings::AppConfig;
use crate::domain::normalize_player_name;
use crate::services::{ConsolePage, MutationOutcome};
use crate::session::LoginOutcome;
use crate::storage::FileCredentialStore;

type LivePage = ConsolePage<EloApiClient, FileCredentialStore>;

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn load_config(cli: &Cli) -> AppConfig {
    let config = AppConfig::from_env();
    match &cli.host {
        Some(host) => config.with_base_url(host.as_str()),
        None => config,
    }
}

pub fn handle_show(config: &AppConfig) -> Result<()> {
    block_on(async {
        let page = open_page(config).await?;
        print!("{}", view::render_page(&page.visible_controls(), &page.summary()));
        Ok(())
    })
}

pub fn handle_status(config: &AppConfig) -> Result<()> {
    block_on(async {
        let page = open_page(config).await?;
        let state = if page.authorization().is_authorized() {
            "authorized"
        } else {
            "not authorized"
        };
        println!("Session: {}", state);
        print!("{}", view::render_controls(&page.visible_controls()));
        Ok(())
    })
}

pub fn handle_players(config: &AppConfig) -> Result<()> {
    block_on(async {
        let page = open_page(config).await?;
        print!("{}", view::render_roster(&page.roster()));
        Ok(())
    })
}

pub fn handle_login(config: &AppConfig, username: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(password) => password.to_string(),
        None => dialoguer::Password::new()
            .with_prompt(format!("Password for {}", username))
            .interact()
            .context("Failed to read password")?,
    };

    block_on(async {
        let mut page = open_page(config).await?;
        match page.login(username, &password).await {
            LoginOutcome::Issued => {
                println!("Logged in.");
                Ok(())
            }
            LoginOutcome::Failed(_) => bail!("Login failed"),
        }
    })
}

pub fn handle_add_player(config: &AppConfig, words: &[String]) -> Result<()> {
    let name = normalize_player_name(&words.join(" "));
    block_on(async {
        let mut page = open_page(config).await?;
        let outcome = page.add_player(&name).await;
        report(&page, outcome, &format!("Added player {}", name))
    })
}

pub fn handle_record_match(config: &AppConfig, winner: &[String], loser: &[String]) -> Result<()> {
    let winner = normalize_player_name(&winner.join(" "));
    let loser = normalize_player_name(&loser.join(" "));
    block_on(async {
        let mut page = open_page(config).await?;
        let outcome = page.record_match(&winner, &loser).await;
        report(&page, outcome, &format!("Recorded {} beating {}", winner, loser))
    })
}

pub fn handle_candidates(
    config: &AppConfig,
    winner: Option<&[String]>,
    loser: Option<&[String]>,
) -> Result<()> {
    block_on(async {
        let mut page = open_page(config).await?;
        if let Some(words) = winner {
            page.select_winner(&normalize_player_name(&words.join(" ")))?;
        }
        if let Some(words) = loser {
            page.select_loser(&normalize_player_name(&words.join(" ")))?;
        }
        print!("{}", view::render_candidates("Winner", &page.winner_candidates()));
        print!("{}", view::render_candidates("Loser", &page.loser_candidates()));
        Ok(())
    })
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

// --- Helper Functions ---

fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(future)
}

async fn open_page(config: &AppConfig) -> Result<LivePage> {
    let service = Arc::new(EloApiClient::new(&config.service)?);
    let store = Arc::new(FileCredentialStore::for_origin(
        &config.storage.dir,
        service.base_url(),
        config.storage.token_key,
    )?);
    Ok(ConsolePage::load(service, store).await)
}

/// Prints the refreshed standings; anything but `Applied` is an error
fn report(page: &LivePage, outcome: MutationOutcome, success: &str) -> Result<()> {
    match outcome {
        MutationOutcome::Applied => {
            println!("{}", success);
            print!("{}", view::render_standings(&page.summary().ordered_players));
            Ok(())
        }
        MutationOutcome::ControlHidden => bail!("Not authorized; run `login` first"),
        MutationOutcome::Invalid(e) => bail!("Invalid input: {}", e),
        MutationOutcome::Failed(kind) => bail!("Request failed ({:?}); see log for details", kind),
    }
}
