use colored::Colorize;

use crate::domain::{MatchRecord, Player, RosterSnapshot, Summary};
use crate::session::Control;

/// Left-aligned text table; numeric columns are right-aligned
struct Table {
    headers: Vec<&'static str>,
    right_aligned: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(columns: &[(&'static str, bool)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| *h).collect(),
            right_aligned: columns.iter().map(|(_, r)| *r).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .zip(&self.right_aligned)
            .map(|((h, w), right)| pad(h, *w, *right))
            .collect();
        out.push_str(&header.join("  ").bold().to_string());
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .zip(&self.right_aligned)
                .map(|((cell, w), right)| pad(cell, *w, *right))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }

        out
    }
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn title(text: &str) -> String {
    format!("{}\n", text.bold().underline())
}

pub fn render_standings(players: &[Player]) -> String {
    let mut table = Table::new(&[("Name", false), ("Elo", true), ("Wins", true), ("Losses", true)]);
    for player in players {
        table.push(vec![
            player.name.clone(),
            format!("{:.1}", player.elo),
            player.wins.to_string(),
            player.losses.to_string(),
        ]);
    }
    format!("{}{}", title("Elo Summary"), table.render())
}

pub fn render_history(matches: &[MatchRecord]) -> String {
    let mut table = Table::new(&[("Winner", false), ("Loser", false), ("Date", false)]);
    for record in matches {
        let date = record
            .played_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| record.date.clone());
        table.push(vec![record.winner.clone(), record.loser.clone(), date]);
    }
    format!("{}{}", title("Match History"), table.render())
}

pub fn render_roster(roster: &RosterSnapshot) -> String {
    let mut table = Table::new(&[("Name", false)]);
    for name in roster.names() {
        table.push(vec![name.to_string()]);
    }
    format!("{}{}", title("Players"), table.render())
}

/// One labelled list of selectable player names
pub fn render_candidates(label: &str, players: &[Player]) -> String {
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    format!("{}: {}\n", label.bold(), names.join(", "))
}

pub fn render_controls(controls: &[Control]) -> String {
    let labels: Vec<String> = controls
        .iter()
        .map(|c| format!("[{}]", c.label()))
        .collect();
    format!("{}\n", labels.join(" "))
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = render_standings(&summary.ordered_players);
    out.push('\n');
    out.push_str(&render_history(&summary.match_history));
    if let Some(hydrated) = &summary.last_hydrated {
        out.push_str(&format!("\n{} {}\n", "Last updated:".dimmed(), hydrated));
    }
    out
}

/// Controls followed by standings and history
pub fn render_page(controls: &[Control], summary: &Summary) -> String {
    format!("{}\n{}", render_controls(controls), render_summary(summary))
}
