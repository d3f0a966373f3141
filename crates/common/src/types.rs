use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Function selectors the simulated transactions call.
pub const METHOD_IDS: [&str; 3] = ["0x60806040", "0xa9059cbb", "0x23b872dd"];

/// One row of the raw dataset. Columns are matched by header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "block_time_format")]
    pub block_time: NaiveDateTime,
    pub from_address: String,
    pub value_usd: Decimal,
    pub tx_hash: String,
    pub method_id: String,
}

impl Transaction {
    pub fn date(&self) -> chrono::NaiveDate {
        self.block_time.date()
    }
}

mod block_time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const READ_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(WRITE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        READ_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid block_time: {raw:?}")))
    }
}
