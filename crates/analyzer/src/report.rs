use std::fmt::Write as _;

use crate::classification::{Classification, ExclusionReason};

/// Wallet-level outcome of the organic filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationSummary {
    pub total_wallets: usize,
    pub organic_wallets: usize,
    /// Per-threshold failure counts. A wallet failing several thresholds is
    /// counted under each of them.
    pub too_few_transactions: usize,
    pub insufficient_volume: usize,
    pub too_young: usize,
}

impl ClassificationSummary {
    pub fn from_classifications<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a Classification>,
    {
        let mut s = Self::default();
        for label in labels {
            s.total_wallets += 1;
            if label.is_organic() {
                s.organic_wallets += 1;
            }
            for reason in label.reasons() {
                match reason {
                    ExclusionReason::TooFewTransactions { .. } => s.too_few_transactions += 1,
                    ExclusionReason::InsufficientVolume { .. } => s.insufficient_volume += 1,
                    ExclusionReason::TooYoung { .. } => s.too_young += 1,
                }
            }
        }
        s
    }

    pub fn non_organic_wallets(&self) -> usize {
        self.total_wallets - self.organic_wallets
    }

    /// `1 - organic / total`, or `None` for an empty wallet set.
    #[allow(clippy::cast_precision_loss)]
    pub fn bot_ratio(&self) -> Option<f64> {
        if self.total_wallets == 0 {
            return None;
        }
        Some(1.0 - self.organic_wallets as f64 / self.total_wallets as f64)
    }
}

pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}%", r * 100.0),
        None => "N/A".to_string(),
    }
}

/// Console block printed after classification.
pub fn render_summary(summary: &ClassificationSummary, rules: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Applying Sybil filters...");
    for rule in rules {
        let _ = writeln!(out, "   * {rule}");
    }
    let _ = writeln!(out, "   - Total Unique Wallets: {}", summary.total_wallets);
    let _ = writeln!(out, "   - Organic Wallets: {}", summary.organic_wallets);
    let _ = writeln!(
        out,
        "   - Bot/Sybil Ratio: {}",
        format_ratio(summary.bot_ratio())
    );
    if summary.non_organic_wallets() > 0 {
        let _ = writeln!(
            out,
            "   - Failed thresholds: too_few_transactions={} insufficient_volume={} too_young={}",
            summary.too_few_transactions, summary.insufficient_volume, summary.too_young
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn non_organic(reasons: Vec<ExclusionReason>) -> Classification {
        Classification::NonOrganic(reasons)
    }

    #[test]
    fn test_empty_wallet_set_has_no_ratio() {
        let s = ClassificationSummary::from_classifications(&Vec::<Classification>::new());
        assert_eq!(s.total_wallets, 0);
        assert_eq!(s.bot_ratio(), None);
        assert_eq!(format_ratio(s.bot_ratio()), "N/A");
        assert!(render_summary(&s, &[]).contains("Bot/Sybil Ratio: N/A"));
    }

    #[test]
    fn test_counts_and_ratio() {
        let labels = vec![
            Classification::Organic,
            non_organic(vec![ExclusionReason::TooYoung {
                age_days: 0,
                must_exceed: 7,
            }]),
            non_organic(vec![
                ExclusionReason::TooFewTransactions {
                    tx_count: 1,
                    must_exceed: 5,
                },
                ExclusionReason::InsufficientVolume {
                    total_value_usd: Decimal::ONE,
                    min_required: Decimal::TEN,
                },
                ExclusionReason::TooYoung {
                    age_days: 0,
                    must_exceed: 7,
                },
            ]),
            Classification::Organic,
        ];
        let s = ClassificationSummary::from_classifications(&labels);
        assert_eq!(s.total_wallets, 4);
        assert_eq!(s.organic_wallets, 2);
        assert_eq!(s.non_organic_wallets(), 2);
        assert_eq!(s.too_young, 2);
        assert_eq!(s.too_few_transactions, 1);
        assert_eq!(s.insufficient_volume, 1);
        assert_eq!(format_ratio(s.bot_ratio()), "50.0%");
    }

    #[test]
    fn test_render_summary_lines() {
        let s = ClassificationSummary {
            total_wallets: 8,
            organic_wallets: 1,
            too_few_transactions: 7,
            insufficient_volume: 0,
            too_young: 3,
        };
        let text = render_summary(&s, &["rule one".to_string()]);
        assert!(text.contains("   * rule one\n"));
        assert!(text.contains("Total Unique Wallets: 8"));
        assert!(text.contains("Organic Wallets: 1"));
        assert!(text.contains("Bot/Sybil Ratio: 87.5%"));
        assert!(text.contains("too_few_transactions=7"));
    }

    #[test]
    fn test_all_organic_ratio_is_zero_percent() {
        let s = ClassificationSummary::from_classifications(&[Classification::Organic]);
        assert_eq!(format_ratio(s.bot_ratio()), "0.0%");
    }
}
