//! External system integrations for candex.
//!
//! - [`upstream`] - the paginated candidates API
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with scripted implementations. The export core depends only
//! on the [`upstream::CandidateSource`] trait; HTTP types never cross it.
//!
//! ```rust,no_run
//! use candex::adapters::upstream::{CandidateSource, PageRequest, TeamtailorClient};
//! use candex::config::load_config;
//! use candex::core::cancel::Cancellation;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("candex.toml")?;
//! let client = TeamtailorClient::new(&config.upstream)?;
//! let request = PageRequest::first_page("/candidates", "job-applications", 30);
//! let response = client.get(&request, &Cancellation::never()).await?;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

pub mod upstream;
