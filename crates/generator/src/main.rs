use std::collections::HashSet;

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

mod cli;
mod metrics;
mod synth;

fn main() -> Result<()> {
    let inv = cli::parse_args(std::env::args()).map_err(anyhow::Error::msg)?;
    let config = match inv.config_path.as_deref() {
        Some(path) => common::config::Config::load_from(path)?,
        None => common::config::Config::load()?,
    };

    let dispatch = common::observability::build_dispatch("generator", &config.general.log_level);
    tracing::dispatcher::set_global_default(dispatch).map_err(anyhow::Error::msg)?;

    let prometheus = config
        .metrics_textfile()
        .map(|_| common::observability::install_textfile_recorder())
        .transpose()?;
    metrics::describe();

    let seed = inv
        .seed
        .or(config.generator.seed)
        .unwrap_or_else(rand::random::<u64>);
    let today = chrono::Local::now().date_naive();
    let params = synth::SynthParams::from_config(&config.generator, today)?;
    tracing::info!(
        seed,
        days = params.days,
        start_date = %params.start_date,
        "generating synthetic transactions"
    );

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let txs = synth::generate(&params, &mut rng)?;

    let output_path = &config.paths.raw_data;
    common::dataset::write_transactions(output_path, &txs)?;

    let unique_wallets = txs
        .iter()
        .map(|t| t.from_address.as_str())
        .collect::<HashSet<_>>()
        .len();
    metrics::record_dataset(params.days, txs.len(), unique_wallets);
    tracing::info!(
        transactions = txs.len(),
        unique_wallets,
        path = %output_path,
        "raw dataset written"
    );
    println!("Generated {} raw transactions to {output_path}", txs.len());

    if let (Some(handle), Some(path)) = (prometheus.as_ref(), config.metrics_textfile()) {
        common::observability::write_textfile(handle, path)?;
    }
    Ok(())
}
