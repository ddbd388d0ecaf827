use fxhash::FxHashMap;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::config::Target;
use crate::core::stats::{SshStatus, Status, TargetStats};
use crate::tui::filter::VisiblePage;
use crate::tui::models::StatusMode;
use crate::tui::renderer::FrameData;
use crate::tui::styles::{
    DOWN_COLOR, FILTER_COLOR, HEADER_BORDER_COLOR, HEADER_COLOR, MUTED_COLOR, PAGE_INFO_COLOR,
    UP_COLOR,
};

/// ヘッダーに表示する全ターゲット横断の集計
/// フィルタやページングの影響を受けない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SummaryCounts {
    pub(crate) total: usize,
    pub(crate) online: usize,
    pub(crate) offline: usize,
    /// SSHがOK以外(未チェック含む)のターゲット数
    pub(crate) no_ssh: usize,
}

pub(crate) fn summary_counts(
    registry: &[Target],
    snapshot: &FxHashMap<Target, TargetStats>,
) -> SummaryCounts {
    let total = registry.len();
    let online = registry
        .iter()
        .filter(|t| snapshot.get(t).is_some_and(|s| s.status == Status::Up))
        .count();
    let no_ssh = registry
        .iter()
        .filter(|t| !snapshot.get(t).is_some_and(|s| s.ssh == SshStatus::Ok))
        .count();
    SummaryCounts {
        total,
        online,
        offline: total - online,
        no_ssh,
    }
}

pub(crate) fn render_header_content(
    frame: &mut Frame,
    area: Rect,
    data: &FrameData,
    page: &VisiblePage,
) {
    let counts = summary_counts(data.registry, data.snapshot);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(MUTED_COLOR);
    let sep = Span::raw("  |  ");

    let mut spans = vec![
        Span::styled("TOTAL: ", bold),
        Span::raw(counts.total.to_string()),
        sep.clone(),
        Span::styled("Online: ", bold.fg(UP_COLOR)),
        Span::raw(counts.online.to_string()),
        sep.clone(),
        Span::styled("Offline: ", bold.fg(DOWN_COLOR)),
        Span::raw(counts.offline.to_string()),
        sep.clone(),
        Span::styled("No SSH: ", bold),
        Span::styled(counts.no_ssh.to_string(), Style::default().fg(DOWN_COLOR)),
        sep.clone(),
        Span::styled(
            format!("Interval: {}s  Window: {}", data.interval_secs, data.window),
            muted,
        ),
    ];

    let query = data.filter.query.trim();
    if !query.is_empty() {
        spans.push(sep.clone());
        spans.push(Span::styled("Filter: ", bold.fg(FILTER_COLOR)));
        spans.push(Span::styled(query.to_string(), bold));
        spans.push(Span::styled(
            format!("  ({}/{})", page.items.len(), counts.total),
            muted,
        ));
    }
    match data.filter.mode {
        StatusMode::All => {}
        StatusMode::Up => {
            spans.push(sep.clone());
            spans.push(Span::styled(
                "Status: UP + SSH OK",
                Style::default().fg(UP_COLOR),
            ));
        }
        StatusMode::Down => {
            spans.push(sep.clone());
            spans.push(Span::styled(
                "Status: DOWN or no SSH",
                Style::default().fg(DOWN_COLOR),
            ));
        }
    }

    let (start, end) = if page.total_filtered == 0 {
        (0, 0)
    } else {
        (
            (page.page - 1) * data.page_size + 1,
            (page.page * data.page_size).min(page.total_filtered),
        )
    };
    spans.push(sep.clone());
    spans.push(Span::styled(
        format!("Page {}/{}", page.page, page.total_pages),
        bold.fg(PAGE_INFO_COLOR),
    ));
    spans.push(Span::styled(
        format!("  Targets {start}-{end} of {}", page.total_filtered),
        muted,
    ));
    spans.push(sep);
    spans.push(Span::styled(
        "← → prev/next  Home/End first/last  Esc=clear  u=UP d=DOWN a=all  i=interval",
        muted,
    ));

    let header = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(HEADER_COLOR))
        .block(Block::bordered().border_style(Style::default().fg(HEADER_BORDER_COLOR)));
    frame.render_widget(header, area);
}
