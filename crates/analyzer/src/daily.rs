use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use common::types::Transaction;
use serde::Serialize;

/// Reported (raw) vs organic daily active wallets for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyActive {
    pub date: NaiveDate,
    pub reported_dau: u32,
    pub organic_dau: u32,
}

/// Distinct senders per calendar date.
pub fn unique_wallets_per_day<'a, I>(transactions: I) -> BTreeMap<NaiveDate, u32>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut seen: BTreeMap<NaiveDate, HashSet<&'a str>> = BTreeMap::new();
    for tx in transactions {
        seen.entry(tx.date())
            .or_default()
            .insert(tx.from_address.as_str());
    }
    seen.into_iter()
        .map(|(date, wallets)| (date, u32::try_from(wallets.len()).unwrap_or(u32::MAX)))
        .collect()
}

pub fn organic_wallets_per_day(
    transactions: &[Transaction],
    organic: &BTreeSet<String>,
) -> BTreeMap<NaiveDate, u32> {
    unique_wallets_per_day(
        transactions
            .iter()
            .filter(|tx| organic.contains(&tx.from_address)),
    )
}

/// Aligns both series on the union of their dates, zero-filling gaps.
pub fn merge(
    reported: &BTreeMap<NaiveDate, u32>,
    organic: &BTreeMap<NaiveDate, u32>,
) -> Vec<DailyActive> {
    let dates: BTreeSet<NaiveDate> = reported.keys().chain(organic.keys()).copied().collect();
    dates
        .into_iter()
        .map(|date| DailyActive {
            date,
            reported_dau: reported.get(&date).copied().unwrap_or(0),
            organic_dau: organic.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
