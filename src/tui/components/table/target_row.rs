use chrono::Duration;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Row};

use crate::config::Target;
use crate::core::stats::{SshStatus, Status, TargetStats};
use crate::tui::components::table::bar::{UptimeBand, create_uptime_bar};
use crate::tui::styles::{DOWN_COLOR, MUTED_COLOR, UP_COLOR, UPTIME_BAR_WIDTH};

/// レイテンシ値をフォーマット
fn format_latency(latency: Option<Duration>) -> String {
    match latency {
        Some(rtt) => rtt.num_milliseconds().to_string(),
        None => "-".to_string(),
    }
}

/// スナップショットの1エントリからテーブル行を作成
/// ストアのロックには一切触れない
pub(crate) fn create_target_row(target: &Target, stats: Option<&TargetStats>) -> Row<'static> {
    let (status_cell, reach_cell) = match stats.map(|s| s.status) {
        Some(Status::Up) => (
            Cell::from("UP").style(
                Style::default()
                    .fg(UP_COLOR)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::from("Reachable").style(Style::default().fg(UP_COLOR)),
        ),
        _ => (
            Cell::from("DN").style(
                Style::default()
                    .fg(DOWN_COLOR)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::from("Unreachable").style(Style::default().fg(DOWN_COLOR)),
        ),
    };

    let ssh_cell = match stats.map(|s| s.ssh) {
        Some(SshStatus::Ok) => Cell::from("OK").style(
            Style::default()
                .fg(UP_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
        Some(SshStatus::Failed) => Cell::from("NO").style(Style::default().fg(DOWN_COLOR)),
        _ => Cell::from("—").style(Style::default().fg(MUTED_COLOR)),
    };

    let uptime = stats.map(TargetStats::uptime_percent).unwrap_or(0.0);
    let band = UptimeBand::classify(uptime);
    let bar_cell = Cell::from(create_uptime_bar(uptime, UPTIME_BAR_WIDTH))
        .style(Style::default().fg(band.color()));

    Row::new(vec![
        Cell::from(target.to_string()),
        status_cell,
        reach_cell,
        ssh_cell,
        Cell::from(format_latency(stats.and_then(|s| s.latency))),
        bar_cell,
        Cell::from(format!("{uptime:.0}%")),
    ])
}
