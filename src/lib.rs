//! Typed client for the GitHub REST API.
//!
//! Every operation performs exactly one request and returns an
//! [`ApiResponse`] carrying the status code, the decoded payload or the raw
//! error text, and the rate-limit snapshot reported by GitHub.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use gh_rest::{ClientOptions, GitHubClient};
//!
//! let client = GitHubClient::new(&ClientOptions::load()?)?;
//! let repo = client.repositories().get("rust-lang", "rust").await;
//! if let Some(repo) = repo.data {
//!     println!("{:?} has {:?} stars", repo.full_name, repo.stargazers_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod github;

pub use config::ClientOptions;
pub use github::*;
