use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use log::warn;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::Session;
use crate::core::ping_worker::PingWorker;
use crate::core::probe::{Pinger, TcpProber};
use crate::core::ssh_worker::SshWorker;
use crate::tui::models::IntervalState;

/// SSHワーカーのjoin待ちに周回間隔へ上乗せする猶予
const SSH_JOIN_GRACE: Duration = Duration::seconds(5);

/// ターゲットごとのPingワーカーとSSHチェッカーをまとめて起動・停止するプール
pub(crate) struct WorkerPool {
    token: CancellationToken,
    interval: Arc<IntervalState>,
    ssh_cycle: Duration,
    ping_workers: Vec<PingWorker>,
    ssh_worker: SshWorker,
}

impl WorkerPool {
    pub(crate) fn new(
        session: &Session,
        config: &Config,
        pinger: Arc<dyn Pinger>,
        prober: Arc<dyn TcpProber>,
    ) -> Self {
        // 各ターゲットに対してPing Workerを作成
        let ping_workers = session
            .registry
            .iter()
            .map(|target| {
                PingWorker::new(
                    session.token.clone(),
                    target.clone(),
                    session.stats.clone(),
                    session.interval.clone(),
                    pinger.clone(),
                )
            })
            .collect();

        // SSHチェッカーは全ターゲットを1タスクで周回する
        let ssh_worker = SshWorker::new(
            session.token.clone(),
            session.registry.clone(),
            session.stats.clone(),
            prober,
            config.ssh_interval,
            config.ssh_port,
        );

        Self {
            token: session.token.clone(),
            interval: session.interval.clone(),
            ssh_cycle: config.ssh_interval,
            ping_workers,
            ssh_worker,
        }
    }

    /// 全ワーカーを起動し、停止シグナル後にそれぞれをタイムアウト付きでjoinする
    /// 期限内に終了しないワーカーは警告を出して放置する(再試行しない)
    pub(crate) async fn run(self) {
        let mut ping_handles = Vec::new();
        for worker in self.ping_workers {
            ping_handles.push(tokio::spawn(worker.run()));
        }
        let ssh_handle = tokio::spawn(self.ssh_worker.run());

        self.token.cancelled().await;

        // join期限: Pingワーカーは現在の送信間隔の2倍
        let ping_deadline = (self.interval.current() * 2)
            .to_std()
            .unwrap_or(StdDuration::from_secs(2));
        for handle in ping_handles {
            if timeout(ping_deadline, handle).await.is_err() {
                warn!("A ping worker did not stop within {ping_deadline:?}, abandoning it");
            }
        }

        let ssh_deadline = (self.ssh_cycle + SSH_JOIN_GRACE)
            .to_std()
            .unwrap_or(StdDuration::from_secs(5));
        if timeout(ssh_deadline, ssh_handle).await.is_err() {
            warn!("SSH worker did not stop within {ssh_deadline:?}, abandoning it");
        }
    }
}
