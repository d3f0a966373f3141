use crate::classification::Classification;
use crate::pipeline::TractionAnalysis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Wallet { address: String },
    Organic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub config_path: Option<String>,
}

pub fn parse_args<I>(mut args: I) -> std::result::Result<Invocation, String>
where
    I: Iterator<Item = String>,
{
    // Drop argv[0].
    let _ = args.next();

    let mut command = None;
    let mut config_path = None;
    while let Some(arg) = args.next() {
        let next = match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| "usage: analyzer --config <path>".to_string())?;
                config_path = Some(path);
                continue;
            }
            "run" => Command::Run,
            "organic" => Command::Organic,
            "wallet" => {
                let address = args
                    .next()
                    .ok_or_else(|| "usage: analyzer wallet <address>".to_string())?;
                Command::Wallet { address }
            }
            other => return Err(format!("unknown command: {other}")),
        };
        if command.replace(next).is_some() {
            return Err("only one command may be given".to_string());
        }
    }

    Ok(Invocation {
        command: command.unwrap_or(Command::Run),
        config_path,
    })
}

/// Handles the inspection commands. `Run` is driven by `main`.
pub fn run_command(analysis: &TractionAnalysis, cmd: &Command) {
    match cmd {
        Command::Run => {}
        Command::Wallet { address } => {
            for line in wallet_lines(analysis, address) {
                println!("{line}");
            }
        }
        Command::Organic => {
            for line in organic_lines(analysis) {
                println!("{line}");
            }
        }
    }
}

pub fn wallet_lines(analysis: &TractionAnalysis, address: &str) -> Vec<String> {
    let mut out = vec![format!("Wallet: {address}")];
    let Some(stats) = analysis.wallet_stats.get(address) else {
        out.push("  (not in dataset)".to_string());
        return out;
    };
    out.push(format!(
        "  tx_count={}  total_value_usd={}",
        stats.tx_count,
        stats.total_value_usd.round_dp(2)
    ));
    out.push(format!(
        "  first_seen={}  last_seen={}  age_days={}",
        stats.first_seen,
        stats.last_seen,
        stats.age_days()
    ));
    match analysis.labels.get(address) {
        Some(Classification::Organic) => out.push("  classification=ORGANIC".to_string()),
        Some(Classification::NonOrganic(reasons)) => {
            out.push("  classification=NON_ORGANIC".to_string());
            out.extend(reasons.iter().map(|r| format!("    - {r}")));
        }
        None => {}
    }
    out
}

pub fn organic_lines(analysis: &TractionAnalysis) -> Vec<String> {
    let mut out = vec![format!(
        "Organic wallets ({} of {}):",
        analysis.summary.organic_wallets, analysis.summary.total_wallets
    )];
    for wallet in &analysis.organic {
        let tx_count = analysis.wallet_stats.get(wallet).map_or(0, |s| s.tx_count);
        out.push(format!("{wallet}  tx_count={tx_count}"));
    }
    out
}
