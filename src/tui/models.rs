use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Duration;
use crossterm::event;
use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub(crate) enum Event {
    Init,
    Quit,
    Error,
    Key(event::KeyEvent),
}

/// 到達性によるフィルタモード
/// Upは「pingがUPかつSSHがOK」、Downは「pingがDOWNまたはSSHがNG」を残す
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum StatusMode {
    All,
    Up,
    Down,
}

/// フィルタ・ページネーションの現在値
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Filter {
    /// テキストフィルタクエリ
    pub(crate) query: String,

    /// ステータスフィルタモード
    pub(crate) mode: StatusMode,

    /// 現在のページ(1始まり)
    pub(crate) page: usize,
}

impl Filter {
    pub(crate) fn new(query: String, mode: StatusMode) -> Self {
        Self {
            query,
            mode,
            page: 1,
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(String::new(), StatusMode::All)
    }
}

/// 入力ハンドラが所有する共有フィルタ状態
/// statsロックとは独立したロックで保護し、入力経路がプローブ更新を待たないようにする
pub(crate) struct FilterState {
    inner: Mutex<Filter>,
}

impl FilterState {
    pub(crate) fn new(initial: Filter) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    pub(crate) fn current(&self) -> Filter {
        self.inner.lock().clone()
    }

    /// テキストフィルタをクリアして1ページ目に戻る
    pub(crate) fn clear_query(&self) {
        let mut filter = self.inner.lock();
        filter.query.clear();
        filter.page = 1;
    }

    /// クエリ末尾に1文字追加して1ページ目に戻る
    pub(crate) fn push_char(&self, c: char) {
        let mut filter = self.inner.lock();
        filter.query.push(c);
        filter.page = 1;
    }

    /// クエリ末尾の1文字を削除する(ページは維持)
    pub(crate) fn pop_char(&self) {
        self.inner.lock().query.pop();
    }

    /// ステータスモードを設定して1ページ目に戻る
    pub(crate) fn set_mode(&self, mode: StatusMode) {
        let mut filter = self.inner.lock();
        filter.mode = mode;
        filter.page = 1;
    }

    pub(crate) fn prev_page(&self) {
        let mut filter = self.inner.lock();
        filter.page = filter.page.saturating_sub(1).max(1);
    }

    /// 次ページへ進む(上限クランプはフィルタエンジン側で行う)
    pub(crate) fn next_page(&self) {
        self.inner.lock().page += 1;
    }

    pub(crate) fn first_page(&self) {
        self.inner.lock().page = 1;
    }

    /// 最終ページへ移動する
    /// 実ページ数はフィルタ内容に依存するため大きな値を入れてエンジンにクランプさせる
    pub(crate) fn last_page(&self) {
        self.inner.lock().page = Self::LAST_PAGE_REQUEST;
    }

    pub(crate) const LAST_PAGE_REQUEST: usize = 9999;
}

/// Ping送信間隔のプリセット(ミリ秒)
pub(crate) const INTERVAL_PRESETS_MS: [u64; 6] = [500, 1000, 2000, 5000, 10000, 30000];

/// 全Pingワーカーが共有する送信間隔
/// Relaxedな読み書きのみで同期しない
/// ワーカーは各サイクル先頭で読み直すため、古い値が見えても次サイクルで追従する
pub(crate) struct IntervalState {
    millis: AtomicU64,
}

impl IntervalState {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            millis: AtomicU64::new(interval.num_milliseconds().max(1) as u64),
        }
    }

    pub(crate) fn current(&self) -> Duration {
        Duration::milliseconds(self.millis.load(Ordering::Relaxed) as i64)
    }

    pub(crate) fn current_secs(&self) -> f64 {
        self.millis.load(Ordering::Relaxed) as f64 / 1000.0
    }

    /// プリセットリストの次の間隔へ循環的に切り替える
    /// 現在値以上の最初のプリセットの次を選ぶ(末尾からは先頭へ戻る)
    pub(crate) fn cycle_next(&self) {
        let current = self.millis.load(Ordering::Relaxed);
        let idx = INTERVAL_PRESETS_MS
            .iter()
            .position(|&p| p >= current)
            .unwrap_or(0);
        let next = INTERVAL_PRESETS_MS[(idx + 1) % INTERVAL_PRESETS_MS.len()];
        self.millis.store(next, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_state_query_mutations() {
        // [正常系] 文字追加でページが1に戻る
        let state = FilterState::new(Filter::default());
        state.next_page();
        state.next_page();
        assert_eq!(state.current().page, 3);

        state.push_char('a');
        let filter = state.current();
        assert_eq!(filter.query, "a");
        assert_eq!(filter.page, 1);

        // [正常系] Backspaceはページを維持する
        state.push_char('b');
        state.next_page();
        state.pop_char();
        let filter = state.current();
        assert_eq!(filter.query, "a");
        assert_eq!(filter.page, 2);

        // [正常系] 空クエリでのBackspaceは何もしない
        state.clear_query();
        state.pop_char();
        assert_eq!(state.current().query, "");

        // [正常系] クリアでクエリが空になりページが1に戻る
        state.push_char('x');
        state.next_page();
        state.clear_query();
        let filter = state.current();
        assert_eq!(filter.query, "");
        assert_eq!(filter.page, 1);
    }

    #[test]
    fn test_filter_state_mode_and_pages() {
        // [正常系] モード変更でページが1に戻る
        let state = FilterState::new(Filter::default());
        state.next_page();
        state.set_mode(StatusMode::Up);
        let filter = state.current();
        assert_eq!(filter.mode, StatusMode::Up);
        assert_eq!(filter.page, 1);

        // [正常系] ページ移動: 前ページは1未満にならない
        state.prev_page();
        state.prev_page();
        assert_eq!(state.current().page, 1);

        state.next_page();
        assert_eq!(state.current().page, 2);

        // [正常系] Home/Endに相当する移動
        state.last_page();
        assert_eq!(state.current().page, FilterState::LAST_PAGE_REQUEST);
        state.first_page();
        assert_eq!(state.current().page, 1);
    }

    #[test]
    fn test_interval_state_cycle() {
        // [正常系] プリセットを順番に循環する
        let state = IntervalState::new(Duration::seconds(1));
        assert_eq!(state.current(), Duration::seconds(1));

        state.cycle_next();
        assert_eq!(state.current(), Duration::seconds(2));
        state.cycle_next();
        assert_eq!(state.current(), Duration::seconds(5));
        state.cycle_next();
        assert_eq!(state.current(), Duration::seconds(10));
        state.cycle_next();
        assert_eq!(state.current(), Duration::seconds(30));

        // [正常系] 末尾からは先頭へ戻る
        state.cycle_next();
        assert_eq!(state.current(), Duration::milliseconds(500));
        state.cycle_next();
        assert_eq!(state.current(), Duration::seconds(1));

        // [正常系] プリセット外の値からは次に大きいプリセットの次へ進む
        let state = IntervalState::new(Duration::milliseconds(700));
        state.cycle_next();
        assert_eq!(state.current(), Duration::seconds(2));

        // [正常系] 全プリセットより大きい値からは2番目のプリセットへ
        let state = IntervalState::new(Duration::seconds(60));
        state.cycle_next();
        assert_eq!(state.current(), Duration::seconds(1));
        assert_eq!(state.current_secs(), 1.0);
    }
}
