use ratatui::style::Color;

/// コアテーマ色
pub(crate) const UP_COLOR: Color = Color::Green;
pub(crate) const DOWN_COLOR: Color = Color::Red;
pub(crate) const MUTED_COLOR: Color = Color::Gray;

/// 稼働率バンドの色
pub(crate) const HEALTHY_COLOR: Color = Color::Green;
pub(crate) const DEGRADED_COLOR: Color = Color::Yellow;
pub(crate) const CRITICAL_COLOR: Color = Color::Red;
pub(crate) const UNKNOWN_COLOR: Color = Color::DarkGray;

/// UI要素の色
pub(crate) const FILTER_COLOR: Color = Color::Yellow;
pub(crate) const HEADER_COLOR: Color = Color::Cyan;
pub(crate) const HEADER_BORDER_COLOR: Color = Color::LightBlue;
pub(crate) const TABLE_HEADER_COLOR: Color = Color::Magenta;
pub(crate) const PAGE_INFO_COLOR: Color = Color::Cyan;
