use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use log::info;
use tokio_util::sync::CancellationToken;

use crate::config::Target;
use crate::core::probe::Pinger;
use crate::core::stats::StatsStore;
use crate::tui::models::IntervalState;

/// プローブコマンド自体のタイムアウトに対する猶予
/// 送信間隔が変わっても1回の試行は interval + 2秒 で必ず打ち切られる
const ATTEMPT_GRACE: Duration = Duration::seconds(2);

/// 1ターゲットを監視し続けるワーカー
/// 停止シグナル以外では決して終了しない
pub(crate) struct PingWorker {
    token: CancellationToken,
    target: Target,
    stats: Arc<StatsStore>,
    interval: Arc<IntervalState>,
    pinger: Arc<dyn Pinger>,
}

impl PingWorker {
    pub(crate) fn new(
        token: CancellationToken,
        target: Target,
        stats: Arc<StatsStore>,
        interval: Arc<IntervalState>,
        pinger: Arc<dyn Pinger>,
    ) -> Self {
        Self {
            token,
            target,
            stats,
            interval,
            pinger,
        }
    }

    pub(crate) async fn run(self) {
        info!("Starting ping worker for target: {}", self.target);

        loop {
            if self.token.is_cancelled() {
                break;
            }

            // 間隔は毎サイクル読み直す
            // 切り替え直後のサイクルは古い間隔のままでよい
            let interval = self.interval.current();
            let started = Instant::now();

            let success = tokio::select! {
                _ = self.token.cancelled() => break,
                success = self.pinger.ping(&self.target, interval + ATTEMPT_GRACE) => success,
            };
            let elapsed = Duration::from_std(started.elapsed()).unwrap_or(Duration::zero());

            // プローブの失敗(タイムアウト・解決不能・プロセスエラー)はすべて
            // 到達不能として記録され、ワーカー自体は停止しない
            self.stats.record_ping(&self.target, success, elapsed);

            // サイクル開始からinterval経過するまで待機
            let wait = interval
                .to_std()
                .unwrap_or_default()
                .saturating_sub(started.elapsed());
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        info!("Ping worker for target {} is stopping", self.target);
    }
}
