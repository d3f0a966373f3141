use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use common::types::Transaction;
use rust_decimal::Decimal;

/// Lifetime aggregate of one wallet over the whole dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletStats {
    pub tx_count: u32,
    pub total_value_usd: Decimal,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
}

impl WalletStats {
    fn new(tx: &Transaction) -> Self {
        Self {
            tx_count: 1,
            total_value_usd: tx.value_usd,
            first_seen: tx.block_time,
            last_seen: tx.block_time,
        }
    }

    fn absorb(&mut self, tx: &Transaction) {
        self.tx_count = self.tx_count.saturating_add(1);
        self.total_value_usd += tx.value_usd;
        self.first_seen = self.first_seen.min(tx.block_time);
        self.last_seen = self.last_seen.max(tx.block_time);
    }

    /// Whole days between first and last sighting, truncated. A wallet seen
    /// once is 0 days old.
    pub fn age_days(&self) -> i64 {
        (self.last_seen - self.first_seen).num_days()
    }
}

/// Groups transactions by sender. Keyed in address order so reports are stable.
pub fn aggregate(transactions: &[Transaction]) -> BTreeMap<String, WalletStats> {
    let mut out: BTreeMap<String, WalletStats> = BTreeMap::new();
    for tx in transactions {
        match out.get_mut(&tx.from_address) {
            Some(stats) => stats.absorb(tx),
            None => {
                out.insert(tx.from_address.clone(), WalletStats::new(tx));
            }
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use common::types::Transaction;
    use rust_decimal::Decimal;

    pub fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    pub fn at(day: i64, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            + Duration::days(day)
    }

    pub fn tx(wallet: &str, block_time: NaiveDateTime, value: Decimal) -> Transaction {
        Transaction {
            block_time,
            from_address: wallet.to_string(),
            value_usd: value,
            tx_hash: format!("0x{wallet}{}", block_time.and_utc().timestamp()),
            method_id: "0xa9059cbb".to_string(),
        }
    }

    /// `count` transactions for `wallet`, `step_days` apart starting at day 0,
    /// splitting `total` evenly.
    pub fn spaced_txs(wallet: &str, count: u32, step_days: i64, total: Decimal) -> Vec<Transaction> {
        let each = total / Decimal::from(count);
        (0..count)
            .map(|i| tx(wallet, at(i64::from(i) * step_days, 12), each))
            .collect()
    }
}
