pub mod gate;
pub mod issuer;

pub use gate::{visible_controls, Control, SessionGate};
pub use issuer::{CredentialIssuer, LoginDialog, LoginOutcome};
