use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use anyhow::{anyhow, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::wallet_stats::WalletStats;

/// Thresholds of the organic filter. A wallet is organic iff
/// `tx_count > min_tx_count`, `total_value_usd >= min_total_value_usd` and
/// `age_days > min_age_days`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub min_tx_count: u32,
    pub min_total_value_usd: Decimal,
    pub min_age_days: i64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_tx_count: 5,
            min_total_value_usd: Decimal::TEN,
            min_age_days: 7,
        }
    }
}

impl ClassifierConfig {
    /// Build from common config `[classifier]` (for production).
    pub fn from_config(c: &common::config::Classifier) -> Result<Self> {
        let min_total_value_usd = Decimal::from_f64(c.min_total_value_usd).ok_or_else(|| {
            anyhow!(
                "classifier.min_total_value_usd is not a finite amount: {}",
                c.min_total_value_usd
            )
        })?;
        Ok(Self {
            min_tx_count: c.min_tx_count,
            min_total_value_usd,
            min_age_days: c.min_age_days,
        })
    }
}

/// One failed threshold, with the wallet's metric and the configured bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    TooFewTransactions {
        tx_count: u32,
        must_exceed: u32,
    },
    InsufficientVolume {
        total_value_usd: Decimal,
        min_required: Decimal,
    },
    TooYoung {
        age_days: i64,
        must_exceed: i64,
    },
}

impl ExclusionReason {
    pub fn reason_str(&self) -> &'static str {
        match self {
            Self::TooFewTransactions { .. } => "TOO_FEW_TRANSACTIONS",
            Self::InsufficientVolume { .. } => "INSUFFICIENT_VOLUME",
            Self::TooYoung { .. } => "TOO_YOUNG",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewTransactions {
                tx_count,
                must_exceed,
            } => write!(f, "{}: tx_count={tx_count} (needs > {must_exceed})", self.reason_str()),
            Self::InsufficientVolume {
                total_value_usd,
                min_required,
            } => write!(
                f,
                "{}: total_value_usd={} (needs >= {min_required})",
                self.reason_str(),
                total_value_usd.round_dp(2)
            ),
            Self::TooYoung {
                age_days,
                must_exceed,
            } => write!(f, "{}: age_days={age_days} (needs > {must_exceed})", self.reason_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Organic,
    /// Every threshold the wallet failed, in count/volume/age order. Never empty.
    NonOrganic(Vec<ExclusionReason>),
}

impl Classification {
    pub fn is_organic(&self) -> bool {
        matches!(self, Self::Organic)
    }

    pub fn reasons(&self) -> &[ExclusionReason] {
        match self {
            Self::Organic => &[],
            Self::NonOrganic(reasons) => reasons,
        }
    }
}

/// Returns every threshold `stats` fails; empty means organic.
pub fn exclusion_reasons(stats: &WalletStats, config: &ClassifierConfig) -> Vec<ExclusionReason> {
    let mut reasons = Vec::new();
    if stats.tx_count <= config.min_tx_count {
        reasons.push(ExclusionReason::TooFewTransactions {
            tx_count: stats.tx_count,
            must_exceed: config.min_tx_count,
        });
    }
    if stats.total_value_usd < config.min_total_value_usd {
        reasons.push(ExclusionReason::InsufficientVolume {
            total_value_usd: stats.total_value_usd,
            min_required: config.min_total_value_usd,
        });
    }
    let age_days = stats.age_days();
    if age_days <= config.min_age_days {
        reasons.push(ExclusionReason::TooYoung {
            age_days,
            must_exceed: config.min_age_days,
        });
    }
    reasons
}

pub fn classify(stats: &WalletStats, config: &ClassifierConfig) -> Classification {
    let reasons = exclusion_reasons(stats, config);
    if reasons.is_empty() {
        Classification::Organic
    } else {
        Classification::NonOrganic(reasons)
    }
}

pub fn classify_all(
    stats: &BTreeMap<String, WalletStats>,
    config: &ClassifierConfig,
) -> BTreeMap<String, Classification> {
    stats
        .iter()
        .map(|(wallet, s)| (wallet.clone(), classify(s, config)))
        .collect()
}

/// The organic address set, used downstream as a filter predicate.
pub fn organic_wallets(labels: &BTreeMap<String, Classification>) -> BTreeSet<String> {
    labels
        .iter()
        .filter(|(_, label)| label.is_organic())
        .map(|(wallet, _)| wallet.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet_stats::aggregate;
    use crate::wallet_stats::test_support::{at, d, spaced_txs, tx};

    fn stats(tx_count: u32, total: &str, age_days: i64) -> WalletStats {
        WalletStats {
            tx_count,
            total_value_usd: d(total),
            first_seen: at(0, 12),
            last_seen: at(age_days, 12),
        }
    }

    #[test]
    fn test_wallet_w_ten_txs_over_ten_days_is_organic() {
        let table = aggregate(&spaced_txs("0xw", 10, 1, d("50")));
        let w = &table["0xw"];
        assert_eq!(w.tx_count, 10);
        assert_eq!(w.age_days(), 9);
        assert_eq!(classify(w, &ClassifierConfig::default()), Classification::Organic);
    }

    #[test]
    fn test_wallet_x_fails_value_threshold() {
        let table = aggregate(&spaced_txs("0xx", 10, 1, d("5")));
        let result = classify(&table["0xx"], &ClassifierConfig::default());
        assert_eq!(
            result,
            Classification::NonOrganic(vec![ExclusionReason::InsufficientVolume {
                total_value_usd: d("5"),
                min_required: d("10"),
            }])
        );
    }

    #[test]
    fn test_wallet_y_fails_count_threshold() {
        let table = aggregate(&spaced_txs("0xy", 3, 15, d("100")));
        let y = &table["0xy"];
        assert_eq!(y.age_days(), 30);
        assert_eq!(
            classify(y, &ClassifierConfig::default()),
            Classification::NonOrganic(vec![ExclusionReason::TooFewTransactions {
                tx_count: 3,
                must_exceed: 5,
            }])
        );
    }

    #[test]
    fn test_single_transaction_wallet_never_organic() {
        let table = aggregate(&[tx("0xone", at(0, 0), d("1000000"))]);
        let result = classify(&table["0xone"], &ClassifierConfig::default());
        assert!(!result.is_organic());
        assert!(result
            .reasons()
            .iter()
            .any(|r| matches!(r, ExclusionReason::TooYoung { age_days: 0, .. })));
    }

    #[test]
    fn test_boundaries() {
        let cfg = ClassifierConfig::default();
        // count is strict: 5 fails, 6 passes
        assert!(!classify(&stats(5, "50", 30), &cfg).is_organic());
        assert!(classify(&stats(6, "50", 30), &cfg).is_organic());
        // value is inclusive: exactly 10 passes
        assert!(classify(&stats(6, "10", 30), &cfg).is_organic());
        assert!(!classify(&stats(6, "9.999999", 30), &cfg).is_organic());
        // age is strict: 7 fails, 8 passes
        assert!(!classify(&stats(6, "50", 7), &cfg).is_organic());
        assert!(classify(&stats(6, "50", 8), &cfg).is_organic());
    }

    #[test]
    fn test_all_failed_thresholds_reported_in_order() {
        let result = classify(&stats(1, "0.5", 0), &ClassifierConfig::default());
        let names: Vec<_> = result.reasons().iter().map(ExclusionReason::reason_str).collect();
        assert_eq!(names, ["TOO_FEW_TRANSACTIONS", "INSUFFICIENT_VOLUME", "TOO_YOUNG"]);
    }

    #[test]
    fn test_raising_thresholds_never_adds_organic_wallets() {
        let population: Vec<WalletStats> = (0..12u32)
            .flat_map(|count| {
                ["0", "9.5", "10", "25", "400"]
                    .into_iter()
                    .flat_map(move |v| [0i64, 7, 8, 20, 90].map(move |age| stats(count, v, age)))
            })
            .collect();

        let base = ClassifierConfig::default();
        let stricter = [
            ClassifierConfig {
                min_tx_count: 8,
                ..base.clone()
            },
            ClassifierConfig {
                min_total_value_usd: d("30"),
                ..base.clone()
            },
            ClassifierConfig {
                min_age_days: 30,
                ..base.clone()
            },
        ];

        for s in &population {
            let before = classify(s, &base).is_organic();
            for cfg in &stricter {
                if classify(s, cfg).is_organic() {
                    assert!(before, "stricter {cfg:?} promoted {s:?}");
                }
            }
        }
        // Sanity: the population is not trivially all one label.
        assert!(population.iter().any(|s| classify(s, &base).is_organic()));
        assert!(population.iter().any(|s| !classify(s, &base).is_organic()));
    }

    #[test]
    fn test_organic_wallets_set() {
        let mut txs = spaced_txs("0xw", 10, 1, d("50"));
        txs.extend(spaced_txs("0xx", 10, 1, d("5")));
        txs.extend(spaced_txs("0xy", 3, 15, d("100")));
        let table = aggregate(&txs);

        let labels = classify_all(&table, &ClassifierConfig::default());
        assert_eq!(labels.len(), 3);
        assert!(labels["0xw"].is_organic());

        let organic = organic_wallets(&labels);
        assert_eq!(organic.into_iter().collect::<Vec<_>>(), vec!["0xw".to_string()]);
    }

    #[test]
    fn test_from_config() {
        let cfg = common::config::Config::from_toml_str(include_str!("../../../config/default.toml"))
            .unwrap();
        let c = ClassifierConfig::from_config(&cfg.classifier).unwrap();
        assert_eq!(c, ClassifierConfig::default());

        let mut bad = cfg.classifier.clone();
        bad.min_total_value_usd = f64::NAN;
        assert!(ClassifierConfig::from_config(&bad).is_err());
    }

    #[test]
    fn test_display_includes_metric_and_bound() {
        let r = ExclusionReason::InsufficientVolume {
            total_value_usd: d("4.567"),
            min_required: d("10"),
        };
        assert_eq!(r.to_string(), "INSUFFICIENT_VOLUME: total_value_usd=4.57 (needs >= 10)");
    }
}
