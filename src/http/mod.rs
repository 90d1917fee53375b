pub mod client;

pub use client::ServiceHttpClient;
