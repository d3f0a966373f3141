use anyhow::{ensure, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use common::types::{Transaction, METHOD_IDS};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

const SECONDS_PER_DAY: i64 = 86_400;
const VALUE_DECIMAL_PLACES: u32 = 6;

/// Knobs for one synthetic dataset. Built from `[generator]` config.
#[derive(Debug, Clone)]
pub struct SynthParams {
    pub days: u32,
    pub start_date: NaiveDate,
    pub base_daily_volume: f64,
    pub noise_std_dev: f64,
    pub min_daily_transactions: u32,
    pub unique_wallet_ratio: f64,
    pub high_activity_wallet_share: f64,
    pub high_activity_tx_share: f64,
    pub value_mean_usd: f64,
}

impl SynthParams {
    pub fn from_config(cfg: &common::config::Generator, today: NaiveDate) -> Result<Self> {
        let start_date = cfg
            .start_date
            .unwrap_or_else(|| today - Duration::days(i64::from(cfg.days)));
        let params = Self {
            days: cfg.days,
            start_date,
            base_daily_volume: cfg.base_daily_volume,
            noise_std_dev: cfg.noise_std_dev,
            min_daily_transactions: cfg.min_daily_transactions,
            unique_wallet_ratio: cfg.unique_wallet_ratio,
            high_activity_wallet_share: cfg.high_activity_wallet_share,
            high_activity_tx_share: cfg.high_activity_tx_share,
            value_mean_usd: cfg.value_mean_usd,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.noise_std_dev >= 0.0,
            "noise_std_dev must be >= 0, got {}",
            self.noise_std_dev
        );
        ensure!(
            self.value_mean_usd > 0.0,
            "value_mean_usd must be > 0, got {}",
            self.value_mean_usd
        );
        for (name, v) in [
            ("unique_wallet_ratio", self.unique_wallet_ratio),
            ("high_activity_wallet_share", self.high_activity_wallet_share),
            ("high_activity_tx_share", self.high_activity_tx_share),
        ] {
            ensure!((0.0..=1.0).contains(&v), "{name} must be within [0, 1], got {v}");
        }
        Ok(())
    }
}

/// Damped-logarithmic growth with multiplicative gaussian noise, floored at
/// `min_daily_transactions`.
pub fn daily_volume(params: &SynthParams, day_index: u32, noise: f64) -> u32 {
    let trend = params.base_daily_volume * (f64::from(day_index) + 5.0).ln();
    #[allow(clippy::cast_possible_truncation)]
    let raw = (trend * (1.0 + noise)) as i64;
    let floor = i64::from(params.min_daily_transactions);
    u32::try_from(raw.max(floor)).unwrap_or(u32::MAX)
}

pub fn random_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("0x{}", hex::encode(rng.gen::<[u8; 20]>()))
}

pub fn random_tx_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("0x{}", hex::encode(rng.gen::<[u8; 32]>()))
}

/// Picks a pool index for each of `n` transactions. Indices below
/// `high_len` are the high-activity cohort.
pub fn assign_wallets<R: Rng + ?Sized>(
    pool_len: usize,
    high_len: usize,
    n: usize,
    high_tx_share: f64,
    rng: &mut R,
) -> Vec<usize> {
    if pool_len == 0 {
        return Vec::new();
    }
    let high_len = high_len.min(pool_len);
    (0..n)
        .map(|_| {
            let pick_high = rng.gen::<f64>() < high_tx_share;
            if (pick_high && high_len > 0) || high_len == pool_len {
                rng.gen_range(0..high_len)
            } else {
                rng.gen_range(high_len..pool_len)
            }
        })
        .collect()
}

fn to_value(sample: f64) -> Decimal {
    Decimal::from_f64(sample)
        .unwrap_or_default()
        .round_dp(VALUE_DECIMAL_PLACES)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn generate<R: Rng + ?Sized>(params: &SynthParams, rng: &mut R) -> Result<Vec<Transaction>> {
    let noise = Normal::new(0.0, params.noise_std_dev)?;
    let values = Exp::new(1.0 / params.value_mean_usd)?;

    let mut block_times = Vec::new();
    for day in 0..params.days {
        let midnight = (params.start_date + Duration::days(i64::from(day))).and_time(NaiveTime::MIN);
        let count = daily_volume(params, day, noise.sample(rng));
        for _ in 0..count {
            let second = rng.gen_range(0..SECONDS_PER_DAY);
            block_times.push(midnight + Duration::seconds(second));
        }
    }

    let n = block_times.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let pool_len = ((n as f64 * params.unique_wallet_ratio) as usize).max(1);
    let pool: Vec<String> = (0..pool_len).map(|_| random_address(rng)).collect();
    let high_len = (pool_len as f64 * params.high_activity_wallet_share) as usize;
    let owners = assign_wallets(pool_len, high_len, n, params.high_activity_tx_share, rng);

    let txs = block_times
        .into_iter()
        .zip(owners)
        .map(|(block_time, owner)| Transaction {
            block_time,
            from_address: pool[owner].clone(),
            value_usd: to_value(values.sample(rng)),
            tx_hash: random_tx_hash(rng),
            method_id: METHOD_IDS
                .choose(rng)
                .copied()
                .unwrap_or(METHOD_IDS[0])
                .to_string(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        transactions = txs.len(),
        wallets = pool_len,
        high_activity_wallets = high_len,
        "synthetic dataset generated"
    );
    Ok(txs)
}
