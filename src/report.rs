// Human-readable and JSON rendering of a recommendation

use std::fmt::Write as _;
use std::str::FromStr;

use crate::core::{GridSettings, MarketAnalysis, Recommendation};
use crate::error::{AnalyzerError, AnalyzerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AnalyzerError::InvalidParameter(
                "format".to_string(),
                format!("expected 'text' or 'json', got '{}'", other),
            )),
        }
    }
}

pub fn render(recommendation: &Recommendation, format: OutputFormat) -> AnalyzerResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(recommendation)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(recommendation)?),
    }
}

pub fn render_text(recommendation: &Recommendation) -> String {
    let mut out = render_analysis(&recommendation.analysis);
    out.push('\n');
    out.push_str(&render_settings(&recommendation.settings));
    out
}

pub fn render_analysis(analysis: &MarketAnalysis) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "## Market Analysis");
    let _ = writeln!(out, "- Symbol: {}", analysis.symbol);
    let _ = writeln!(out, "- Daily Volatility: {}%", analysis.daily_volatility);
    let _ = writeln!(out, "- Weekly Volatility: {}%", analysis.weekly_volatility);
    let _ = writeln!(out, "- 24h Volume: ${} million", analysis.volume_musd);
    let _ = writeln!(out, "- Funding Fee: {}%", analysis.funding_fee_pct);
    let _ = writeln!(out, "- Range High: ${}", analysis.range_high);
    let _ = writeln!(out, "- Range Low: ${}", analysis.range_low);
    out
}

pub fn render_settings(settings: &GridSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Grid Bot Settings");
    let _ = writeln!(out, "- Leverage: {}x", settings.leverage);
    let _ = writeln!(out, "- Price Range: {}", settings.price_range_label);
    let _ = writeln!(out, "- Grid Count: {}", settings.grid_count);
    let _ = writeln!(out, "- Stop-Loss: {}%", settings.stop_loss_pct);
    let _ = writeln!(out, "- Take-Profit: {}%", settings.take_profit_pct);
    let _ = writeln!(
        out,
        "- Commission Discount: {}",
        if settings.commission_discount_enabled { "Yes" } else { "No" }
    );
    out
}
