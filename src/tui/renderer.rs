use fxhash::FxHashMap;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::config::Target;
use crate::core::stats::TargetStats;
use crate::tui::components::{header, main_content};
use crate::tui::filter;
use crate::tui::models::Filter;
use crate::tui::styles::HEADER_HEIGHT;

/// 1フレーム分の描画入力
/// スナップショットとフィルタ状態の不変コピーのみを持ち、描画中に共有ロックへは触れない
pub(crate) struct FrameData<'a> {
    pub(crate) registry: &'a [Target],
    pub(crate) snapshot: &'a FxHashMap<Target, TargetStats>,
    pub(crate) filter: &'a Filter,
    pub(crate) interval_secs: f64,
    pub(crate) window: usize,
    pub(crate) page_size: usize,
}

/// 全UIコンポーネントを統制するメインレンダー関数
pub(crate) fn render(frame: &mut Frame, data: &FrameData) {
    let page = filter::visible(
        data.registry,
        data.snapshot,
        &data.filter.query,
        data.filter.mode,
        data.filter.page,
        data.page_size,
    );

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // ヘッダー
            Constraint::Min(0),                // メインコンテンツ
        ])
        .split(frame.area());

    header::render_header_content(frame, main_layout[0], data, &page);
    main_content::render_table_content(frame, main_layout[1], data, &page);
}
