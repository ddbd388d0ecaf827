use std::collections::VecDeque;

use chrono::Duration;
use fxhash::FxHashMap;
use parking_lot::Mutex;

use crate::config::Target;

/// 直近の履歴から導出されるPing到達性ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Up,
    Down,
}

/// SSHポートチェックの結果
/// 初回チェック完了まではUnknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SshStatus {
    Unknown,
    Ok,
    Failed,
}

/// ターゲットごとの観測結果
/// 書き込みはPingワーカーとSSHチェッカー、読み出しは描画ループが行い、
/// いずれもStatsStoreのロック越しにアクセスする
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TargetStats {
    /// 成否履歴のスライディングウィンドウ(古いものから順)
    history: VecDeque<bool>,

    /// 直近に成功したプローブの所要時間
    /// 一度も成功していない、または直近が失敗ならNone
    pub(crate) latency: Option<Duration>,

    /// 導出済みの到達性ステータス
    pub(crate) status: Status,

    /// SSHポートチェックの結果
    pub(crate) ssh: SshStatus,
}

impl TargetStats {
    fn new() -> Self {
        Self {
            history: VecDeque::new(),
            latency: None,
            status: Status::Down,
            ssh: SshStatus::Unknown,
        }
    }

    /// 成否を履歴に追加し、ウィンドウサイズを超えた分は古い方から捨てる
    fn record(&mut self, success: bool, elapsed: Duration, window: usize) {
        self.history.push_back(success);
        while self.history.len() > window {
            self.history.pop_front();
        }
        self.latency = success.then_some(elapsed);
        self.status = derive_status(&self.history);
    }

    pub(crate) fn history(&self) -> impl Iterator<Item = bool> + '_ {
        self.history.iter().copied()
    }

    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }

    /// ウィンドウ内の成功率(%)
    /// 履歴が空の場合は0
    pub(crate) fn uptime_percent(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let successes = self.history.iter().filter(|&&ok| ok).count();
        successes as f64 / self.history_len() as f64 * 100.0
    }
}

/// 直近最大3件の成否からステータスを導出する
/// 単発のパケットロスでUP/DOWNが暴れないよう、過半数が成功ならUPとする
fn derive_status(history: &VecDeque<bool>) -> Status {
    let tail_len = history.len().min(3);
    let successes = history
        .iter()
        .rev()
        .take(tail_len)
        .filter(|&&ok| ok)
        .count();
    if successes * 2 > tail_len {
        Status::Up
    } else {
        Status::Down
    }
}

/// 全ターゲットの統計を保持する共有ストア
/// 単一ロックで全エントリを保護する
/// 個々のクリティカルセクションはO(1)で短いため、ターゲット別ロックは持たない
pub(crate) struct StatsStore {
    window: usize,
    entries: Mutex<FxHashMap<Target, TargetStats>>,
}

impl StatsStore {
    pub(crate) fn new(targets: &[Target], window: usize) -> Self {
        let mut entries = FxHashMap::default();
        for target in targets {
            entries.insert(target.clone(), TargetStats::new());
        }
        Self {
            window: window.max(1),
            entries: Mutex::new(entries),
        }
    }

    /// Ping結果を記録する
    /// 履歴追加・レイテンシ更新・ステータス再導出をロック内で一括して行う
    pub(crate) fn record_ping(&self, target: &Target, success: bool, elapsed: Duration) {
        let mut entries = self.entries.lock();
        if let Some(stats) = entries.get_mut(target) {
            stats.record(success, elapsed, self.window);
        }
    }

    /// SSHチェック結果を記録する
    pub(crate) fn record_ssh(&self, target: &Target, ok: bool) {
        let mut entries = self.entries.lock();
        if let Some(stats) = entries.get_mut(target) {
            stats.ssh = if ok { SshStatus::Ok } else { SshStatus::Failed };
        }
    }

    pub(crate) fn contains(&self, target: &Target) -> bool {
        self.entries.lock().contains_key(target)
    }

    /// 描画用の不変コピーを返す
    /// 呼び出し側はロックを保持せずに整形処理を行える
    pub(crate) fn snapshot(&self) -> FxHashMap<Target, TargetStats> {
        self.entries.lock().clone()
    }
}
