use ratatui::style::Color;

use crate::tui::styles::{
    BAR_EMPTY, BAR_FILLED, CRITICAL_COLOR, DEGRADED_COLOR, HEALTHY_COLOR, UNKNOWN_COLOR,
};

/// 稼働率の深刻度バンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UptimeBand {
    /// 履歴なし、または成功実績なし
    Unknown,
    /// 80%以上
    Healthy,
    /// 50%以上80%未満
    Degraded,
    /// 50%未満
    Critical,
}

impl UptimeBand {
    pub(crate) fn classify(percent: f64) -> Self {
        if percent <= 0.0 {
            Self::Unknown
        } else if percent >= 80.0 {
            Self::Healthy
        } else if percent >= 50.0 {
            Self::Degraded
        } else {
            Self::Critical
        }
    }

    pub(crate) fn color(self) -> Color {
        match self {
            Self::Unknown => UNKNOWN_COLOR,
            Self::Healthy => HEALTHY_COLOR,
            Self::Degraded => DEGRADED_COLOR,
            Self::Critical => CRITICAL_COLOR,
        }
    }
}

/// 稼働率に比例した括弧つきバー文字列を作る
pub(crate) fn create_uptime_bar(percent: f64, width: usize) -> String {
    let filled = ((percent * width as f64 / 100.0).round() as usize).min(width);
    format!(
        "[{}{}]",
        BAR_FILLED.repeat(filled),
        BAR_EMPTY.repeat(width - filled)
    )
}
