use anyhow::Result;
use env_logger::Env;
use log::error;

use crate::cli::Cli;
use crate::config::Config;
use crate::core::Session;

mod cli;
mod config;
mod core;
mod tui;

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(all(debug_assertions, feature = "tokio-console"))]
    console_subscriber::init();
    env_logger::init_from_env(Env::default().default_filter_or("error"));
    color_eyre::install().map_err(|e| {
        error!("Failed to install color_eyre: {e}");
        anyhow::anyhow!("Failed to install color_eyre")
    })?;

    let cli = Cli::parse();
    let mut config = Config::resolve(&cli)?;
    if config.targets.is_empty() && !cli.no_prompt {
        config.targets = config::prompt_targets()?;
    }
    if config.targets.is_empty() {
        anyhow::bail!("No valid targets. Enter IPs or hostnames (e.g. 8.8.8.8, google.com).");
    }

    let session = Session::new(&config);

    // 監視タスクを起動
    let session_for_monitoring = session.clone();
    let config_for_monitoring = config.clone();
    let mut monitoring_handle = tokio::spawn(async move {
        core::run_monitoring(session_for_monitoring, config_for_monitoring).await;
    });

    // TUIタスクを起動
    let session_for_tui = session.clone();
    let config_for_tui = config.clone();
    let mut tui_handle = tokio::spawn(async move {
        if let Err(e) = tui::run_tui(session_for_tui, &config_for_tui).await {
            let err_msg = format!("Error has occurred in TUI: {e}");
            ratatui::restore();
            error!("{err_msg}");
        }
    });

    // どちらかのタスクが終了したら停止シグナルを送り、もう一方の後片付けを待つ
    // 監視側のjoinはワーカーごとのタイムアウトで抜けることが保証されている
    tokio::select! {
        _ = &mut monitoring_handle => {
            session.token.cancel();
            let _ = tui_handle.await;
        }
        _ = &mut tui_handle => {
            session.token.cancel();
            let _ = monitoring_handle.await;
        }
    }

    Ok(())
}
