//! Typed async clients for the *arr media management APIs: Sonarr, Radarr,
//! Lidarr, Readarr and Prowlarr.
//!
//! ```no_run
//! use arrkit::config::ServiceConfig;
//! use arrkit::http::SonarrClient;
//!
//! # async fn run() -> Result<(), arrkit::http::ArrError> {
//! let sonarr = SonarrClient::new(&ServiceConfig::new("http://localhost:8989", "api-key"))?;
//! for series in sonarr.series().await? {
//!     println!("{series:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod services;
