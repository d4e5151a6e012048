use clap::Parser;
use punk_atlas::core::site::build_site;
use punk_atlas::domain::ports::ConfigProvider;
use punk_atlas::pages::PageKind;
use punk_atlas::utils::logger::{self, LogFormat};
use punk_atlas::utils::validation::Validate;
use punk_atlas::{CliConfig, SiteConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(
        config.logging.enabled,
        cli.verbose,
        config.logging.level.as_deref(),
        config.log_format().unwrap_or(LogFormat::Compact),
    );

    tracing::info!("🚀 Starting punk-atlas");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if cli.dry_run {
        display_plan(&config);
        return Ok(());
    }

    match build_site(&config).await {
        Ok(report) => {
            tracing::info!("📁 Output saved to: {}", report.output_path);
            println!("✅ Built {} pages", report.pages.len());
            for page in &report.pages {
                println!("   {} ({} bytes)", page.file, page.bytes);
            }
            println!("📁 Output saved to: {}", report.output_path);
            if let Some(archive) = &report.archive_path {
                println!("📦 Archive: {}", archive);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Site build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

fn display_plan(config: &SiteConfig) {
    println!("🔍 DRY RUN - no API will be called");
    println!("   Site: {} ({})", config.site_title(), config.site_name());
    for kind in &config.site.pages {
        match kind {
            PageKind::Beers => println!(
                "   beers.html      <- {} (featured id {})",
                config.beers_endpoint(),
                config.featured_beer_id()
            ),
            PageKind::Countries => println!(
                "   countries.html  <- {} (featured code {})",
                config.countries_endpoint(),
                config.featured_country_code()
            ),
        }
    }
    println!("   Output: {}", config.output_path());
    if let Some(archive) = config.archive_filename() {
        println!("   Archive: {}", archive);
    }
}
