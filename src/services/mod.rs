pub mod console;
pub mod workflow;

pub use console::ConsolePage;
pub use workflow::{FetchOutcome, MutationOutcome, RosterMutationWorkflow};
