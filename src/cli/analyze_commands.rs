// Command implementations for the grid-analyzer CLI
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use grid_bot_analyzer::validation::normalize_symbol;
use grid_bot_analyzer::{
    report, AnalyzerError, AnalyzerResult, BinanceFuturesClient, Config, GridBotAnalyzer,
    OutputFormat, PreFlightValidator, Spinner,
};

const CONFIG_TEMPLATE: &str = include_str!("../../config.toml.example");

pub async fn run_analysis(
    symbol: &str,
    days: Option<u32>,
    format: OutputFormat,
    config: &Config,
) -> AnalyzerResult<()> {
    let symbol = normalize_symbol(symbol);
    let lookback_days = days.unwrap_or(config.analysis.lookback_days);

    let validation = PreFlightValidator::new(config.clone()).validate_request(&symbol, lookback_days);
    if !validation.passed {
        validation.display();
        return Err(AnalyzerError::ValidationFailed(format!(
            "{} critical check(s) failed for {}",
            validation.critical_failures().len(),
            symbol
        )));
    }
    for warning in validation.warnings() {
        warn!("⚠️  {}: {}", warning.name, warning.message);
    }

    info!("🔎 Analyzing {} ({} day range)", symbol, lookback_days);

    let client = BinanceFuturesClient::from_config(&config.api, config.analysis.kline_limit)?;
    let analyzer = GridBotAnalyzer::new(client).with_lookback_days(lookback_days);

    let spinner = Spinner::new(&format!("Fetching market data for {}...", symbol));
    let recommendation = match analyzer.recommend(&symbol).await {
        Ok(recommendation) => {
            spinner.finish(&format!("Market data loaded for {}", symbol));
            recommendation
        }
        Err(e) => {
            spinner.finish_with_error(&format!("Analysis failed for {}", symbol));
            return Err(e);
        }
    };

    println!("{}", report::render(&recommendation, format)?);
    Ok(())
}

pub async fn run_check(symbol: Option<&str>, days: Option<u32>, config: &Config) -> AnalyzerResult<()> {
    let symbol = symbol.map(normalize_symbol);
    let lookback_days = days.unwrap_or(config.analysis.lookback_days);

    let validation = PreFlightValidator::new(config.clone())
        .validate_all(symbol.as_deref(), lookback_days)
        .await;
    validation.display();

    if validation.passed {
        Ok(())
    } else {
        Err(AnalyzerError::ValidationFailed(
            "Critical validation checks did not pass".to_string(),
        ))
    }
}

pub fn init_config(config_path: &str, force: bool) -> AnalyzerResult<()> {
    info!("🔧 Initializing configuration...");

    if Path::new(config_path).exists() && !force {
        warn!("⚠️  {} already exists, skipping (use --force to overwrite)", config_path);
        return Ok(());
    }

    fs::write(config_path, CONFIG_TEMPLATE).map_err(|e| {
        error!("❌ Could not write {}", config_path);
        AnalyzerError::FileWrite(e.to_string())
    })?;

    info!("📝 Created {}", config_path);
    info!("💡 Next steps:");
    info!("   1. Optionally add your API key to {}", config_path);
    info!("   2. Run: grid-analyzer check AVAXUSDT");
    info!("   3. Run: grid-analyzer analyze AVAXUSDT");
    Ok(())
}
