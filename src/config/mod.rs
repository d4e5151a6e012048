pub mod cli;
pub mod toml_config;

pub use toml_config::SiteConfig;

#[cfg(feature = "cli")]
use crate::pages::PageKind;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "punk-atlas")]
#[command(about = "Static pages for Punk API beers and GraphQL countries")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override load.output_path
    #[arg(long)]
    pub output_path: Option<String>,

    /// Only build these pages
    #[arg(long, value_enum, value_delimiter = ',')]
    pub page: Vec<PageKind>,

    /// Bundle the generated files into a zip archive
    #[arg(long)]
    pub archive: bool,

    /// Show what would be built without calling any API
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, help = "Disable logging", conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔（沒有指定時使用預設值）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::from_file(path)?,
            None => SiteConfig::default(),
        };

        if let Some(output_path) = &self.output_path {
            config.load.output_path = output_path.clone();
        }
        if !self.page.is_empty() {
            config.site.pages = self.page.clone();
        }
        if self.archive {
            config.load.archive.enabled = true;
        }
        if self.quiet {
            config.logging.enabled = false;
        }

        Ok(config)
    }
}
