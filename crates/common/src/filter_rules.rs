use crate::config::Classifier;

fn fmt_threshold(x: f64) -> String {
    if x.fract().abs() < f64::EPSILON {
        format!("{x:.0}")
    } else {
        let s = format!("{x:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// One line per organic-filter rule, in evaluation order (count, volume, age).
pub fn filter_rule_infos(cfg: &Classifier) -> [String; 3] {
    let count = format!(
        "Lifetime transactions: tx_count > {}.",
        cfg.min_tx_count
    );
    let volume = format!(
        "Lifetime volume: total_value_usd >= {}.",
        fmt_threshold(cfg.min_total_value_usd)
    );
    let age = format!(
        "Wallet age: last_seen - first_seen > {} days.",
        cfg.min_age_days
    );
    [count, volume, age]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_filter_rule_infos_include_thresholds() {
        let cfg = Config::from_toml_str(include_str!("../../../config/default.toml")).unwrap();
        let infos = filter_rule_infos(&cfg.classifier);

        assert!(infos[0].contains("tx_count > 5"));
        assert!(infos[1].contains("total_value_usd >= 10."));
        assert!(infos[2].contains("> 7 days"));
    }

    #[test]
    fn test_fmt_threshold_trims_fraction() {
        assert_eq!(fmt_threshold(10.0), "10");
        assert_eq!(fmt_threshold(12.5), "12.5");
        assert_eq!(fmt_threshold(0.1), "0.1");
    }
}
