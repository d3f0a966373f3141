use metrics::{describe_counter, describe_gauge};

pub fn describe() {
    describe_counter!(
        "generator_transactions_generated_total",
        "Number of synthetic transactions written to the raw dataset."
    );
    describe_gauge!(
        "generator_simulated_days",
        "Number of simulated days in the last generated dataset."
    );
    describe_gauge!(
        "generator_unique_wallets",
        "Distinct wallet addresses in the last generated dataset."
    );
}

pub fn record_dataset(days: u32, transactions: usize, unique_wallets: usize) {
    metrics::counter!("generator_transactions_generated_total").increment(transactions as u64);
    metrics::gauge!("generator_simulated_days").set(f64::from(days));
    #[allow(clippy::cast_precision_loss)]
    metrics::gauge!("generator_unique_wallets").set(unique_wallets as f64);
}
