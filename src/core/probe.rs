use std::process::Stdio;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use log::debug;
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::Target;

/// 到達性プローブの抽象
/// OSのpingコマンドなど外部機構への委譲を差し替え可能にする
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait Pinger: Send + Sync {
    /// ターゲットへ1回のEchoプローブを送り、応答が得られたかを返す
    /// タイムアウト・名前解決失敗・プロセス起動失敗はすべてfalseになり、エラーにはならない
    async fn ping(&self, target: &Target, attempt_timeout: Duration) -> bool;
}

/// TCP接続プローブの抽象
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait TcpProber: Send + Sync {
    /// host:portへのTCP接続を試み、接続が確立できたかを返す
    async fn connect(&self, host: &Target, port: u16, connect_timeout: Duration) -> bool;
}

/// OSのpingバイナリを外部プロセスとして起動するPinger
pub(crate) struct SystemPinger;

/// pingコマンド自身に渡す1回あたりの応答待ち時間
/// 呼び出し側のattempt_timeoutはプロセス全体(名前解決込み)に対する上限
#[cfg(windows)]
const PING_ARGS: [&str; 4] = ["-n", "1", "-w", "1000"];
#[cfg(not(windows))]
const PING_ARGS: [&str; 4] = ["-c", "1", "-W", "1"];

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, target: &Target, attempt_timeout: Duration) -> bool {
        let limit = attempt_timeout
            .to_std()
            .unwrap_or(StdDuration::from_secs(3));
        let output = Command::new("ping")
            .args(PING_ARGS)
            .arg(target.as_str())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match timeout(limit, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!("Failed to run ping for {target}: {e}");
                return false;
            }
            Err(_) => {
                debug!("Ping attempt for {target} timed out");
                return false;
            }
        };

        // 終了コード0に加えて応答行の存在を確認する
        // 一部のping実装は宛先不達でも0を返すことがある
        let stdout = String::from_utf8_lossy(&output.stdout);
        output.status.success()
            && (stdout.contains("Reply from")
                || stdout.contains("bytes from")
                || stdout.contains("received")
                || stdout.to_lowercase().contains("ttl="))
    }
}

/// tokioのTcpStreamで接続を試みるTcpProber
pub(crate) struct SystemTcpProber;

#[async_trait]
impl TcpProber for SystemTcpProber {
    async fn connect(&self, host: &Target, port: u16, connect_timeout: Duration) -> bool {
        let limit = connect_timeout
            .to_std()
            .unwrap_or(StdDuration::from_secs(2));
        match timeout(limit, TcpStream::connect((host.as_str(), port))).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("TCP connect to {host}:{port} failed: {e}");
                false
            }
            Err(_) => {
                debug!("TCP connect to {host}:{port} timed out");
                false
            }
        }
    }
}
