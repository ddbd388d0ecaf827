use fxhash::FxHashMap;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table};

use crate::config::Target;
use crate::core::stats::TargetStats;
use crate::tui::components::table::create_target_row;
use crate::tui::filter::VisiblePage;
use crate::tui::models::{Filter, StatusMode};
use crate::tui::renderer::FrameData;
use crate::tui::styles::{
    MUTED_COLOR, TABLE_HEADER_COLOR, TABLE_LATENCY_COLUMN_WIDTH, TABLE_PERCENT_COLUMN_WIDTH,
    TABLE_REACH_COLUMN_WIDTH, TABLE_SSH_COLUMN_WIDTH, TABLE_STATUS_COLUMN_WIDTH,
    UPTIME_BAR_WIDTH,
};

/// 現在ページのターゲットを左右2分割のテーブルとして描画する
/// 奇数件の場合は左が1件多くなる
pub(crate) fn render_table_content(
    frame: &mut Frame,
    area: Rect,
    data: &FrameData,
    page: &VisiblePage,
) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    if page.items.is_empty() {
        render_empty_content(frame, halves[0], data.filter);
        frame.render_widget(Block::bordered(), halves[1]);
        return;
    }

    let mid = page.items.len().div_ceil(2);
    let (left, right) = page.items.split_at(mid);
    render_half_table(frame, halves[0], left, data.snapshot);
    render_half_table(frame, halves[1], right, data.snapshot);
}

fn render_half_table(
    frame: &mut Frame,
    area: Rect,
    targets: &[Target],
    snapshot: &FxHashMap<Target, TargetStats>,
) {
    let rows: Vec<Row<'static>> = targets
        .iter()
        .map(|target| create_target_row(target, snapshot.get(target)))
        .collect();

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let table = Table::new(
        rows,
        [
            Constraint::Fill(1), // ターゲット列
            Constraint::Length(TABLE_STATUS_COLUMN_WIDTH),
            Constraint::Length(TABLE_REACH_COLUMN_WIDTH),
            Constraint::Length(TABLE_SSH_COLUMN_WIDTH),
            Constraint::Length(TABLE_LATENCY_COLUMN_WIDTH),
            Constraint::Length(UPTIME_BAR_WIDTH as u16 + 2), // バー列(括弧込み)
            Constraint::Length(TABLE_PERCENT_COLUMN_WIDTH),
        ],
    )
    .block(Block::default())
    .header(
        Row::new(vec![
            Cell::from("TARGET").style(bold),
            Cell::from("ST").style(bold),
            Cell::from("REACHABILITY").style(bold),
            Cell::from("SSH").style(bold),
            Cell::from("MS").style(bold),
            Cell::from("UPTIME").style(bold),
            Cell::from("%").style(bold),
        ])
        .style(Style::default().fg(TABLE_HEADER_COLOR))
        .bottom_margin(1),
    );

    frame.render_widget(table, area);
}

fn render_empty_content(frame: &mut Frame, area: Rect, filter: &Filter) {
    let paragraph = Paragraph::new(empty_content_message(filter))
        .style(Style::default().fg(MUTED_COLOR))
        .block(Block::bordered().title("Filter"));
    frame.render_widget(paragraph, area);
}

/// フィルタ結果が空のときの説明文
/// どの条件で絞り込んだ結果なのかを明示する
fn empty_content_message(filter: &Filter) -> String {
    let mut reasons = Vec::new();
    let query = filter.query.trim();
    if !query.is_empty() {
        reasons.push(format!("text filter '{query}'"));
    }
    match filter.mode {
        StatusMode::All => {}
        StatusMode::Up => reasons.push("status=up".to_string()),
        StatusMode::Down => reasons.push("status=down".to_string()),
    }
    if reasons.is_empty() {
        "No targets".to_string()
    } else {
        format!("No targets match {}", reasons.join(" and "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_message() {
        // [正常系] 条件なし
        let filter = Filter::default();
        assert_eq!(empty_content_message(&filter), "No targets");

        // [正常系] テキストフィルタのみ
        let filter = Filter::new("8.8".to_string(), StatusMode::All);
        assert_eq!(
            empty_content_message(&filter),
            "No targets match text filter '8.8'"
        );

        // [正常系] ステータスフィルタのみ
        let filter = Filter::new(String::new(), StatusMode::Up);
        assert_eq!(empty_content_message(&filter), "No targets match status=up");

        // [正常系] 両方の条件
        let filter = Filter::new("db".to_string(), StatusMode::Down);
        assert_eq!(
            empty_content_message(&filter),
            "No targets match text filter 'db' and status=down"
        );
    }
}
