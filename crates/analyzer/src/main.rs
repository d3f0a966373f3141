use std::path::Path;

use anyhow::Result;
use common::dataset::DatasetError;

mod chart;
mod classification;
mod cli;
mod daily;
mod metrics;
mod pipeline;
mod report;
mod wallet_stats;

fn main() -> Result<()> {
    let inv = cli::parse_args(std::env::args()).map_err(anyhow::Error::msg)?;
    let config = match inv.config_path.as_deref() {
        Some(path) => common::config::Config::load_from(path)?,
        None => common::config::Config::load()?,
    };

    let dispatch = common::observability::build_dispatch("analyzer", &config.general.log_level);
    tracing::dispatcher::set_global_default(dispatch).map_err(anyhow::Error::msg)?;

    let prometheus = config
        .metrics_textfile()
        .map(|_| common::observability::install_textfile_recorder())
        .transpose()?;
    metrics::describe();

    let classifier = classification::ClassifierConfig::from_config(&config.classifier)?;

    let transactions = match common::dataset::read_transactions(&config.paths.raw_data) {
        Ok(txs) => txs,
        Err(DatasetError::Missing { path }) => {
            tracing::error!(path = %path.display(), "raw dataset missing");
            eprintln!(
                "Error: '{}' not found. Run the generator first.",
                path.display()
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    println!("Loaded {} raw transactions.", transactions.len());

    let analysis = pipeline::analyze(&transactions, &classifier);
    metrics::record_analysis(&analysis);

    match &inv.command {
        cli::Command::Run => write_outputs(&config, &analysis)?,
        other => cli::run_command(&analysis, other),
    }

    if let (Some(handle), Some(path)) = (prometheus.as_ref(), config.metrics_textfile()) {
        common::observability::write_textfile(handle, path)?;
    }
    Ok(())
}

fn write_outputs(config: &common::config::Config, analysis: &pipeline::TractionAnalysis) -> Result<()> {
    let rules = common::filter_rules::filter_rule_infos(&config.classifier);
    print!("{}", report::render_summary(&analysis.summary, &rules));

    if let Some(path) = config.paths.daily_csv.as_deref() {
        common::dataset::write_rows(path, &analysis.daily)?;
        tracing::info!(path, days = analysis.daily.len(), "daily series written");
    }

    println!("Generating chart...");
    let style = chart::ChartStyle::from_config(&config.chart);
    let html_path = Path::new(&config.paths.chart_html);
    chart::html::render(html_path, &analysis.daily, &style)?;
    let png_path = Path::new(&config.paths.chart_png);
    chart::png::render(png_path, &analysis.daily, &style)?;
    println!(
        "Chart saved to {} (interactive: {})",
        png_path.display(),
        html_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet_stats::test_support::{d, spaced_txs};

    fn config_in(dir: &Path) -> common::config::Config {
        let mut config =
            common::config::Config::from_toml_str(include_str!("../../../config/default.toml"))
                .unwrap();
        let out = |name: &str| dir.join(name).display().to_string();
        config.paths.chart_png = out("assets/chart.png");
        config.paths.chart_html = out("assets/chart.html");
        config.paths.daily_csv = Some(out("data/daily.csv"));
        config.chart.scale = 1;
        config
    }

    #[test]
    fn test_write_outputs_writes_daily_csv_and_both_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut txs = spaced_txs("0xw", 10, 1, d("50"));
        txs.extend(spaced_txs("0xy", 3, 15, d("100")));
        let analysis = pipeline::analyze(
            &txs,
            &classification::ClassifierConfig::from_config(&config.classifier).unwrap(),
        );

        write_outputs(&config, &analysis).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("data/daily.csv")).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,reported_dau,organic_dau"));
        assert_eq!(lines.next(), Some("2024-01-01,2,1"));
        assert_eq!(csv.lines().count(), analysis.daily.len() + 1);
        for chart in ["assets/chart.png", "assets/chart.html"] {
            assert!(std::fs::metadata(dir.path().join(chart)).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_write_outputs_without_daily_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.paths.daily_csv = None;
        let analysis = pipeline::analyze(
            &[],
            &classification::ClassifierConfig::from_config(&config.classifier).unwrap(),
        );

        write_outputs(&config, &analysis).unwrap();

        assert!(!dir.path().join("data").exists());
        assert!(dir.path().join("assets/chart.png").exists());
        assert!(dir.path().join("assets/chart.html").exists());
    }
}
