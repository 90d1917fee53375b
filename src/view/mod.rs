pub mod tables;

pub use tables::{
    render_candidates, render_controls, render_history, render_page, render_roster,
    render_standings, render_summary,
};
