//! Interactive candlestick chart files.
//!
//! One self-contained HTML document per (ticker, timeframe), written under a
//! directory tree partitioned by timeframe. The document embeds Plotly from
//! its CDN and the aggregated series as JSON arrays; a human opens it in a
//! browser, nothing consumes it programmatically.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use stockbook_core::{AggregatedBar, Ticker, Timeframe};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no aggregated bars to chart for '{ticker}'")]
    EmptySeries { ticker: String },
}

/// Create the chart root and one subdirectory per timeframe.
pub fn ensure_chart_dirs(root: &Path) -> Result<(), ChartError> {
    for timeframe in Timeframe::ALL {
        fs::create_dir_all(root.join(timeframe.as_str()))?;
    }
    Ok(())
}

/// Stable output path for one (ticker, timeframe) chart:
/// `<root>/<timeframe>/<TICKER>.html`. One file per ticker per timeframe,
/// overwritten on each run.
pub fn chart_path(root: &Path, timeframe: Timeframe, ticker: &Ticker) -> PathBuf {
    root.join(timeframe.as_str())
        .join(format!("{}.html", ticker.as_str()))
}

/// Render one aggregated series as a candlestick chart document at `path`.
pub fn render_candlestick(
    path: &Path,
    ticker: &Ticker,
    company_name: &str,
    timeframe: Timeframe,
    bars: &[AggregatedBar],
) -> Result<(), ChartError> {
    if bars.is_empty() {
        return Err(ChartError::EmptySeries {
            ticker: ticker.to_string(),
        });
    }

    let document = candlestick_document(ticker, company_name, timeframe, bars)?;
    fs::write(path, document)?;
    Ok(())
}

fn candlestick_document(
    ticker: &Ticker,
    company_name: &str,
    timeframe: Timeframe,
    bars: &[AggregatedBar],
) -> Result<String, ChartError> {
    let title = format!(
        "{} ({}) - {} Chart",
        company_name,
        ticker,
        title_case(timeframe.as_str())
    );

    let dates: Vec<String> = bars.iter().map(|bar| bar.period_end.to_string()).collect();
    let opens: Vec<f64> = bars.iter().map(|bar| bar.open).collect();
    let highs: Vec<f64> = bars.iter().map(|bar| bar.high).collect();
    let lows: Vec<f64> = bars.iter().map(|bar| bar.low).collect();
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();

    // JSON-encoding the title doubles as escaping for the <title> tag and
    // the JS literal.
    let title_json = serde_json::to_string(&title)?;

    Ok(format!(
        r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title_html}</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
</head>
<body style="margin:0;background-color:#111111">
<div id="chart" style="width:100vw;height:100vh"></div>
<script>
const trace = {{
  type: "candlestick",
  x: {dates},
  open: {opens},
  high: {highs},
  low: {lows},
  close: {closes}
}};
const layout = {{
  title: {{ text: {title_json} }},
  xaxis: {{ title: {{ text: "Date" }}, rangeslider: {{ visible: false }} }},
  yaxis: {{ title: {{ text: "Stock Price (INR)" }} }},
  paper_bgcolor: "#111111",
  plot_bgcolor: "#111111",
  font: {{ color: "#e5e5e5" }}
}};
Plotly.newPlot("chart", [trace], layout);
</script>
</body>
</html>
"##,
        title_html = escape_html(&title),
        title_json = title_json,
        dates = serde_json::to_string(&dates)?,
        opens = serde_json::to_string(&opens)?,
        highs = serde_json::to_string(&highs)?,
        lows = serde_json::to_string(&lows)?,
        closes = serde_json::to_string(&closes)?,
    ))
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
