use std::sync::Arc;

use chrono::Duration;
use log::info;
use tokio_util::sync::CancellationToken;

use crate::config::Target;
use crate::core::probe::TcpProber;
use crate::core::stats::StatsStore;

/// 1ターゲットあたりのTCP接続タイムアウト
const CONNECT_TIMEOUT: Duration = Duration::seconds(2);

/// 同一周回内でターゲット間に挟む間隔
/// 全ターゲットへの接続が一斉に走らないようにする
const PACING_DELAY: std::time::Duration = std::time::Duration::from_millis(200);

/// 全ターゲットのSSHポートを周回チェックする単一ワーカー
/// Pingより重く即時性も不要なため、独立した長い周期で回る
pub(crate) struct SshWorker {
    token: CancellationToken,
    registry: Arc<Vec<Target>>,
    stats: Arc<StatsStore>,
    prober: Arc<dyn TcpProber>,
    cycle_interval: Duration,
    port: u16,
}

impl SshWorker {
    pub(crate) fn new(
        token: CancellationToken,
        registry: Arc<Vec<Target>>,
        stats: Arc<StatsStore>,
        prober: Arc<dyn TcpProber>,
        cycle_interval: Duration,
        port: u16,
    ) -> Self {
        Self {
            token,
            registry,
            stats,
            prober,
            cycle_interval,
            port,
        }
    }

    pub(crate) async fn run(self) {
        info!(
            "Starting SSH worker: port {} every {}s",
            self.port,
            self.cycle_interval.num_seconds()
        );

        'outer: loop {
            for target in self.registry.iter() {
                if self.token.is_cancelled() {
                    break 'outer;
                }
                // 周回中にストアから消えたターゲットはスキップ
                if !self.stats.contains(target) {
                    continue;
                }

                let ok = tokio::select! {
                    _ = self.token.cancelled() => break 'outer,
                    ok = self.prober.connect(target, self.port, CONNECT_TIMEOUT) => ok,
                };
                self.stats.record_ssh(target, ok);

                tokio::select! {
                    _ = self.token.cancelled() => break 'outer,
                    _ = tokio::time::sleep(PACING_DELAY) => {}
                }
            }

            let wait = self.cycle_interval.to_std().unwrap_or_default();
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        info!("SSH worker is stopping");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use tokio::time::timeout;

    use super::*;
    use crate::core::probe::MockTcpProber;
    use crate::core::stats::SshStatus;

    #[tokio::test]
    async fn test_run_marks_all_targets() {
        // [正常系] 1周回で全ターゲットのSSHステータスが更新される
        let targets: Vec<Target> = ["10.0.0.1", "10.0.0.2"]
            .iter()
            .map(|s| Target::parse(s).unwrap())
            .collect();
        let stats = Arc::new(StatsStore::new(&targets, 30));
        let registry = Arc::new(targets.clone());

        let mut prober = MockTcpProber::new();
        prober
            .expect_connect()
            .returning(|host, _, _| host.as_str() == "10.0.0.1");

        let token = CancellationToken::new();
        let worker = SshWorker::new(
            token.clone(),
            registry,
            stats.clone(),
            Arc::new(prober),
            Duration::seconds(600),
            22,
        );

        let handle = tokio::spawn(worker.run());
        tokio::time::sleep(StdDuration::from_millis(600)).await;
        token.cancel();
        timeout(StdDuration::from_millis(500), handle)
            .await
            .unwrap()
            .unwrap();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot[&targets[0]].ssh, SshStatus::Ok);
        assert_eq!(snapshot[&targets[1]].ssh, SshStatus::Failed);
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_cycle_sleep() {
        // [正常系] 周回間の長い待機中でも停止シグナルに即座に応答する
        let target = Target::parse("10.0.0.1").unwrap();
        let stats = Arc::new(StatsStore::new(std::slice::from_ref(&target), 30));
        let registry = Arc::new(vec![target]);

        let mut prober = MockTcpProber::new();
        prober.expect_connect().returning(|_, _, _| true);

        let token = CancellationToken::new();
        let worker = SshWorker::new(
            token.clone(),
            registry,
            stats,
            Arc::new(prober),
            Duration::seconds(600),
            22,
        );

        let handle = tokio::spawn(worker.run());
        // 1ターゲット分のチェックとペーシングが終わって周回待機に入るまで待つ
        tokio::time::sleep(StdDuration::from_millis(300)).await;
        token.cancel();

        let result = timeout(StdDuration::from_millis(100), handle).await;
        assert!(result.is_ok());
    }
}
