pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod pages;
pub mod query;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, SiteConfig};
pub use core::site::{build_site, BuildReport, SiteGenerator};
pub use query::{QueryClient, QueryKey};
pub use utils::error::{Result, SiteError};
