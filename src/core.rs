use std::sync::Arc;

use itertools::Itertools;
use log::info;
use tokio::signal::ctrl_c;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, Target};
use crate::core::probe::{SystemPinger, SystemTcpProber};
use crate::core::stats::StatsStore;
use crate::core::worker_pool::WorkerPool;
use crate::tui::models::{Filter, FilterState, IntervalState};

pub(crate) mod ping_worker;
pub(crate) mod probe;
pub(crate) mod ssh_worker;
pub(crate) mod stats;
pub(crate) mod worker_pool;

/// 全タスクが共有するセッションコンテキスト
/// 起動時に一度だけ構築し、各タスクへ明示的に渡す
/// グローバル変数経由のアクセスは行わない
#[derive(Clone)]
pub(crate) struct Session {
    /// 検証済みターゲットの登録順リスト(セッション中は不変)
    pub(crate) registry: Arc<Vec<Target>>,

    /// ターゲットごとの統計ストア
    pub(crate) stats: Arc<StatsStore>,

    /// フィルタ・ページネーション状態
    pub(crate) filter: Arc<FilterState>,

    /// Ping送信間隔
    pub(crate) interval: Arc<IntervalState>,

    /// 全タスク共通の停止シグナル
    pub(crate) token: CancellationToken,
}

impl Session {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            registry: Arc::new(config.targets.clone()),
            stats: Arc::new(StatsStore::new(&config.targets, config.window)),
            filter: Arc::new(FilterState::new(Filter::new(
                config.filter.clone(),
                config.status,
            ))),
            interval: Arc::new(IntervalState::new(config.interval)),
            token: CancellationToken::new(),
        }
    }
}

/// 監視タスク群を起動し、停止シグナルまで走らせる
pub(crate) async fn run_monitoring(session: Session, config: Config) {
    info!(
        "ping targets: [{}]",
        session.registry.iter().map(ToString::to_string).join(", ")
    );

    let pool = WorkerPool::new(
        &session,
        &config,
        Arc::new(SystemPinger),
        Arc::new(SystemTcpProber),
    );

    let _ctrl_c_handle = ctrl_c_handler(session.token.clone());
    pool.run().await;
}

fn ctrl_c_handler(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl + C received, shutting down...");
        token.cancel();
    })
}
