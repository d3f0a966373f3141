use std::collections::{BTreeMap, BTreeSet};

use common::types::Transaction;

use crate::classification::{self, Classification, ClassifierConfig};
use crate::daily::{self, DailyActive};
use crate::report::ClassificationSummary;
use crate::wallet_stats::{self, WalletStats};

/// Everything one analysis run derives from the raw transaction set.
#[derive(Debug, Clone)]
pub struct TractionAnalysis {
    pub transactions: usize,
    pub wallet_stats: BTreeMap<String, WalletStats>,
    pub labels: BTreeMap<String, Classification>,
    pub organic: BTreeSet<String>,
    pub summary: ClassificationSummary,
    pub daily: Vec<DailyActive>,
}

/// aggregate -> classify -> summarize -> daily merge. Pure: the result depends
/// only on `transactions` and `config`.
pub fn analyze(transactions: &[Transaction], config: &ClassifierConfig) -> TractionAnalysis {
    let wallet_stats = wallet_stats::aggregate(transactions);

    let labels = classification::classify_all(&wallet_stats, config);
    let organic = classification::organic_wallets(&labels);
    let summary = ClassificationSummary::from_classifications(labels.values());

    let reported = daily::unique_wallets_per_day(transactions);
    let organic_daily = daily::organic_wallets_per_day(transactions, &organic);
    let daily = daily::merge(&reported, &organic_daily);

    tracing::info!(
        transactions = transactions.len(),
        wallets = summary.total_wallets,
        organic_wallets = summary.organic_wallets,
        days = daily.len(),
        "traction analysis complete"
    );

    TractionAnalysis {
        transactions: transactions.len(),
        wallet_stats,
        labels,
        organic,
        summary,
        daily,
    }
}
