pub mod elo_client;
pub mod models;
pub mod service;

pub use elo_client::EloApiClient;
pub use service::EloService;
