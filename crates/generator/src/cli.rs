#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub seed: Option<u64>,
    pub config_path: Option<String>,
}

pub fn parse_args<I>(mut args: I) -> std::result::Result<Invocation, String>
where
    I: Iterator<Item = String>,
{
    // Drop argv[0].
    let _ = args.next();

    let mut inv = Invocation::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "run" => {}
            "--seed" => {
                let raw = args
                    .next()
                    .ok_or_else(|| "usage: generator --seed <u64>".to_string())?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|e| format!("invalid seed {raw:?}: {e}"))?;
                inv.seed = Some(seed);
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| "usage: generator --config <path>".to_string())?;
                inv.config_path = Some(path);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> impl Iterator<Item = String> {
        v.iter().map(|s| (*s).to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args_defaults() {
        let inv = parse_args(args(&["generator"])).unwrap();
        assert_eq!(inv, Invocation::default());
    }

    #[test]
    fn test_parse_seed_and_config() {
        let inv = parse_args(args(&[
            "generator",
            "run",
            "--seed",
            "42",
            "--config",
            "cfg.toml",
        ]))
        .unwrap();
        assert_eq!(inv.seed, Some(42));
        assert_eq!(inv.config_path.as_deref(), Some("cfg.toml"));
    }

    #[test]
    fn test_parse_rejects_bad_seed_and_unknown() {
        assert!(parse_args(args(&["generator", "--seed", "abc"])).is_err());
        assert!(parse_args(args(&["generator", "--seed"])).is_err());
        assert_eq!(
            parse_args(args(&["generator", "plot"])).unwrap_err(),
            "unknown argument: plot"
        );
    }
}
