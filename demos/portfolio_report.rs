//! Portfolio performance report example
//!
//! Builds a synthetic price table, runs the analytics pipeline and prints the
//! values a charting layer would plot.
//!
//! Run with: cargo run --example portfolio_report [config.yaml]

use ag_analytics::{AnalyticsError, Pipeline, PipelineConfig, PointKind, PriceTable};
use chrono::NaiveDate;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Portfolio Performance Report ===\n");

    // 1. Configuration: from a file if given, equal weights against SP500 otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            PipelineConfig::from_file(&path)?
        }
        None => PipelineConfig::new("SP500"),
    };

    // 2. Price table (one trading year, simulated)
    let prices = simulated_prices()?;
    println!(
        "Price table: {} dates x {} columns (benchmark: {})\n",
        prices.num_rows(),
        prices.num_columns(),
        config.benchmark
    );

    // 3. Run the pipeline
    let pipeline = Pipeline::new(config);
    let result = pipeline.run(&prices)?;

    // 4. Cumulative performance (base 100)
    println!("--- Cumulative Performance (Base 100) ---");
    println!("Date          Portfolio   Benchmark");
    for t in (0..result.dates.len()).step_by(21) {
        println!(
            "{}   {:>9.2}   {:>9.2}",
            result.dates[t], result.port_cum[t], result.bench_cum[t]
        );
    }
    println!();

    // 5. Summary table
    println!("--- Summary ---");
    println!("{:<24}{:>12}{:>12}", "Metric", "Portfolio", result.benchmark);
    for row in result.summary() {
        println!(
            "{:<24}{:>12}{:>12}",
            row.metric,
            fmt_stat(row.metric, row.portfolio),
            fmt_stat(row.metric, row.benchmark)
        );
    }
    println!();

    // 6. Correlation matrix
    println!("--- Asset Correlation Matrix ---");
    let corr = &result.correlation;
    print!("{:<6}", "");
    for label in corr.labels() {
        print!("{:>8}", label);
    }
    println!();
    for (i, label) in corr.labels().iter().enumerate() {
        print!("{:<6}", label);
        for j in 0..corr.len() {
            match corr.get(i, j) {
                Some(value) => print!("{:>8.2}", value),
                None => print!("{:>8}", "n/a"),
            }
        }
        println!();
    }
    println!();

    // 7. Risk / return profile
    println!("--- Risk / Return Profile ---");
    println!("{:<12}{:>12}{:>12}", "Series", "Volatility", "Return");
    for point in &result.risk_return_points {
        let marker = if point.kind == PointKind::Portfolio { " *" } else { "" };
        println!(
            "{:<12}{:>11.2}%{:>11.2}%{}",
            point.label,
            point.annualized_volatility * 100.0,
            point.annualized_return * 100.0,
            marker
        );
    }

    match result.port_stats.sharpe() {
        Ok(sharpe) => println!("\nPortfolio Sharpe ratio: {:.2}", sharpe),
        Err(e) => println!("\nPortfolio Sharpe ratio unavailable: {}", e),
    }

    println!("\n=== Report Complete ===");

    Ok(())
}

fn fmt_stat(metric: &str, value: Option<f64>) -> String {
    match value {
        None => "n/a".to_string(),
        Some(v) if metric == "sharpe_ratio" => format!("{:.2}", v),
        Some(v) => format!("{:.2}%", v * 100.0),
    }
}

/// Deterministic price paths with different drifts, volatilities and co-movement
fn simulated_prices() -> Result<PriceTable, AnalyticsError> {
    let days = 253;
    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .ok_or_else(|| AnalyticsError::InvalidInput("bad start date".to_string()))?;
    let dates = (0..days).map(|i| start + chrono::Days::new(i as u64)).collect();

    let market: Vec<f64> = (0..days)
        .map(|i| (i as f64 * 0.21).sin() * 0.009 + ((i * 7) % 11) as f64 / 11.0 * 0.004 - 0.0015)
        .collect();

    let path = |start: f64, beta: f64, drift: f64, noise: usize, scale: f64| -> Vec<f64> {
        let mut price = start;
        (0..days)
            .map(|i| {
                if i > 0 {
                    let idio = (((i * noise) % 17) as f64 / 17.0 - 0.5) * scale;
                    price *= f64::exp(beta * market[i] + drift + idio);
                }
                price
            })
            .collect()
    };

    PriceTable::from_columns(
        dates,
        vec![
            ("AAPL".to_string(), path(185.0, 1.2, 0.0004, 5, 0.012)),
            ("MSFT".to_string(), path(370.0, 1.1, 0.0006, 7, 0.010)),
            ("NVDA".to_string(), path(480.0, 1.6, 0.0020, 3, 0.025)),
            ("TLT".to_string(), path(98.0, -0.3, -0.0001, 11, 0.006)),
            ("SP500".to_string(), path(4740.0, 1.0, 0.0, 1, 0.0)),
        ],
    )
}
