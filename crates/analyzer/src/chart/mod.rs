use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::daily::DailyActive;

pub mod html;
pub mod png;

pub const REPORTED_LABEL: &str = "Reported Users (Raw)";
pub const ORGANIC_LABEL: &str = "Organic Users (Validated)";
pub const Y_AXIS_LABEL: &str = "Daily Active Wallets";

pub const REPORTED_RGB: (u8, u8, u8) = (128, 128, 128);
pub const ORGANIC_RGB: (u8, u8, u8) = (0x00, 0xC8, 0x53);
pub const REPORTED_FILL_ALPHA: f64 = 0.2;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart backend failed: {0}")]
    Backend(String),
    #[error("chart template failed: {0}")]
    Template(#[from] askama::Error),
    #[error("writing chart '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Presentation settings shared by the static and interactive renderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

impl ChartStyle {
    pub fn from_config(c: &common::config::Chart) -> Self {
        Self {
            title: c.title.clone(),
            width: c.width.max(200),
            height: c.height.max(150),
            scale: c.scale.max(1),
        }
    }
}

/// Upper bound of the y axis: 5% headroom over the largest reported count,
/// never below 1 so an empty chart still has a drawable range.
pub fn y_axis_max(series: &[DailyActive]) -> u32 {
    let peak = series
        .iter()
        .map(|d| d.reported_dau.max(d.organic_dau))
        .max()
        .unwrap_or(0);
    (peak + peak.div_ceil(20)).max(1)
}

/// Label for the `offset`-th day after the first date of the series.
pub fn date_label(start: Option<NaiveDate>, offset: i64) -> String {
    start
        .and_then(|d| d.checked_add_signed(chrono::Duration::days(offset)))
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Day offset of each point from the first date in the series.
pub fn day_offsets(series: &[DailyActive]) -> Vec<i64> {
    let Some(first) = series.first().map(|d| d.date) else {
        return Vec::new();
    };
    series.iter().map(|d| (d.date - first).num_days()).collect()
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), ChartError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ChartError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::series;
    use super::*;

    #[test]
    fn test_y_axis_max_headroom() {
        assert_eq!(y_axis_max(&[]), 1);
        assert_eq!(y_axis_max(&series(&[(1, 100, 10), (2, 40, 39)])), 105);
        assert_eq!(y_axis_max(&series(&[(1, 3, 1)])), 4);
    }

    #[test]
    fn test_day_offsets_follow_calendar_gaps() {
        let s = series(&[(1, 1, 0), (2, 1, 0), (9, 1, 0)]);
        assert_eq!(day_offsets(&s), vec![0, 1, 8]);
        assert!(day_offsets(&[]).is_empty());
    }

    #[test]
    fn test_date_label() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 30);
        assert_eq!(date_label(start, 2), "Feb 01");
        assert_eq!(date_label(None, 2), "");
    }

    #[test]
    fn test_style_from_config_clamps_scale() {
        let cfg = common::config::Chart {
            width: 1000,
            height: 500,
            scale: 0,
            title: "t".to_string(),
        };
        assert_eq!(ChartStyle::from_config(&cfg).scale, 1);
    }
}
