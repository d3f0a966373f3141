use metrics::{describe_counter, describe_gauge};

use crate::pipeline::TractionAnalysis;

pub fn describe() {
    describe_counter!(
        "analyzer_transactions_loaded_total",
        "Number of raw transactions loaded from the dataset."
    );
    describe_gauge!(
        "analyzer_wallets_total",
        "Distinct wallets in the last analyzed dataset."
    );
    describe_gauge!(
        "analyzer_wallets_organic",
        "Wallets passing every organic threshold."
    );
    describe_gauge!(
        "analyzer_bot_ratio",
        "Share of wallets failing at least one organic threshold (absent for an empty dataset)."
    );
    describe_gauge!(
        "analyzer_wallets_excluded",
        "Wallets failing a given threshold, labeled by reason."
    );
    describe_gauge!(
        "analyzer_days_covered",
        "Calendar dates present in the daily active wallet series."
    );
}

#[allow(clippy::cast_precision_loss)]
pub fn record_analysis(analysis: &TractionAnalysis) {
    let s = &analysis.summary;
    metrics::counter!("analyzer_transactions_loaded_total").increment(analysis.transactions as u64);
    metrics::gauge!("analyzer_wallets_total").set(s.total_wallets as f64);
    metrics::gauge!("analyzer_wallets_organic").set(s.organic_wallets as f64);
    if let Some(ratio) = s.bot_ratio() {
        metrics::gauge!("analyzer_bot_ratio").set(ratio);
    }
    for (reason, count) in [
        ("TOO_FEW_TRANSACTIONS", s.too_few_transactions),
        ("INSUFFICIENT_VOLUME", s.insufficient_volume),
        ("TOO_YOUNG", s.too_young),
    ] {
        metrics::gauge!("analyzer_wallets_excluded", "reason" => reason).set(count as f64);
    }
    metrics::gauge!("analyzer_days_covered").set(analysis.daily.len() as f64);
}
