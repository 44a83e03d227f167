use clap::Parser;
use domainpbn::utils::error::{ErrorSeverity, PbnError};
use domainpbn::utils::logger;
use domainpbn::{App, CliConfig};

fn report(e: &PbnError) -> i32 {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("Starting domainpbn {}", env!("CARGO_PKG_VERSION"));

    // 驗證配置
    let config = match cli.app_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            std::process::exit(report(&e).max(1));
        }
    };
    if cli.verbose {
        tracing::debug!("Resolved config: api={} timeout={}s", config.api_base_url, config.timeout_seconds);
    }

    let app = App::new(config);
    if let Err(e) = app.run(cli.command).await {
        let exit_code = report(&e);
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}
