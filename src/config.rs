use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{fmt, fs, io};

use chrono::Duration;
use log::warn;
use serde::Deserialize;
use serde_with::{DurationSecondsWithFrac, serde_as};
use thiserror::Error;

use crate::cli::Cli;
use crate::tui::models::StatusMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ConfigError {
    #[error("Failed to load {0}. error: {1}")]
    LoadFileError(PathBuf, io::ErrorKind),
    #[error(transparent)]
    TomlParseError(#[from] toml::de::Error),
}

/// 検証済みの監視対象
/// ドット区切りIPv4アドレスまたはRFC 1123形式のホスト名(253文字以内)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Target(String);

impl Target {
    /// ホスト名・IPアドレスの最大長
    pub(crate) const MAX_LEN: usize = 253;

    /// 入力文字列をトリムして検証し、有効な場合のみTargetを返す
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return None;
        }
        if Ipv4Addr::from_str(s).is_ok() || is_hostname(s) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_hostname(s: &str) -> bool {
    s.split('.').all(is_hostname_label)
}

fn is_hostname_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= 63
        && bytes.first().is_some_and(u8::is_ascii_alphanumeric)
        && bytes.last().is_some_and(u8::is_ascii_alphanumeric)
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// カンマ・空白区切りの入力文字列を検証済みターゲットのリストに変換
/// 無効なエントリは警告を出して破棄し、重複は初出のみ残す
pub(crate) fn parse_targets(raw: &str) -> Vec<Target> {
    let mut targets = Vec::new();
    for part in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        if part.trim().is_empty() {
            continue;
        }
        match Target::parse(part) {
            Some(target) if !targets.contains(&target) => targets.push(target),
            Some(_) => {}
            None => warn!("Ignoring invalid target: {part}"),
        }
    }
    targets
}

/// TOML設定ファイルの内容
/// すべてのフィールドは省略可能で、CLIフラグが常に優先される
#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub(crate) struct ConfigFile {
    /// 監視対象のリスト
    #[serde(default)]
    pub(crate) targets: Vec<String>,

    /// Ping送信間隔(秒)
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    #[serde(default)]
    pub(crate) interval: Option<Duration>,

    /// 稼働率計算のスライディングウィンドウサイズ
    #[serde(default)]
    pub(crate) window: Option<usize>,

    /// UIの再描画間隔(秒)
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    #[serde(default)]
    pub(crate) refresh: Option<Duration>,

    /// 1ページあたりの表示ターゲット数
    #[serde(default)]
    pub(crate) page_size: Option<usize>,

    /// SSHポートチェックの周回間隔(秒)
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    #[serde(default)]
    pub(crate) ssh_interval: Option<Duration>,

    /// SSHチェックに使用するTCPポート
    #[serde(default)]
    pub(crate) ssh_port: Option<u16>,
}

impl ConfigFile {
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFileError(path.to_path_buf(), e.kind()))?;
        toml::from_str(&content).map_err(ConfigError::TomlParseError)
    }
}

/// 解決済みの実行時設定
/// 優先順位: CLIフラグ > 設定ファイル > 既定値
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    /// 監視対象のリスト(登録順を保持)
    pub(crate) targets: Vec<Target>,

    /// Ping送信間隔
    pub(crate) interval: Duration,

    /// 稼働率計算のスライディングウィンドウサイズ
    pub(crate) window: usize,

    /// UIの再描画間隔
    pub(crate) refresh: Duration,

    /// 1ページあたりの表示ターゲット数
    pub(crate) page_size: usize,

    /// SSHポートチェックの周回間隔
    pub(crate) ssh_interval: Duration,

    /// SSHチェックに使用するTCPポート
    pub(crate) ssh_port: u16,

    /// 初期テキストフィルタ
    pub(crate) filter: String,

    /// 初期ステータスフィルタモード
    pub(crate) status: StatusMode,
}

impl Config {
    pub(crate) fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let raw_targets = if cli.targets.is_empty() {
            file.targets.join(",")
        } else {
            cli.targets.join(",")
        };

        let interval = cli
            .interval
            .map(secs_to_duration)
            .or(file.interval)
            .unwrap_or_else(Self::default_interval)
            .max(Duration::milliseconds(100));
        let refresh = cli
            .refresh
            .map(secs_to_duration)
            .or(file.refresh)
            .unwrap_or_else(Self::default_refresh)
            .max(Duration::milliseconds(100));
        let ssh_interval = cli
            .ssh_interval
            .map(secs_to_duration)
            .or(file.ssh_interval)
            .unwrap_or_else(Self::default_ssh_interval)
            .max(Duration::seconds(5));

        Ok(Self {
            targets: parse_targets(&raw_targets),
            interval,
            window: cli
                .window
                .or(file.window)
                .unwrap_or(Self::DEFAULT_WINDOW)
                .max(1),
            refresh,
            page_size: cli
                .page_size
                .or(file.page_size)
                .unwrap_or(Self::DEFAULT_PAGE_SIZE)
                .max(1),
            ssh_interval,
            ssh_port: cli
                .ssh_port
                .or(file.ssh_port)
                .unwrap_or(Self::DEFAULT_SSH_PORT)
                .max(1),
            filter: cli.filter.clone().unwrap_or_default().trim().to_string(),
            status: cli.status.unwrap_or(StatusMode::All),
        })
    }

    /// デフォルトのPing送信間隔
    fn default_interval() -> Duration {
        Duration::seconds(1)
    }

    /// デフォルトのUI再描画間隔
    fn default_refresh() -> Duration {
        Duration::milliseconds(800)
    }

    /// デフォルトのSSHチェック周回間隔
    fn default_ssh_interval() -> Duration {
        Duration::seconds(600)
    }

    const DEFAULT_WINDOW: usize = 30;
    const DEFAULT_PAGE_SIZE: usize = 100;
    const DEFAULT_SSH_PORT: u16 = 22;
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::milliseconds((secs * 1000.0).round() as i64)
}

/// ターゲット未指定時の対話プロンプト
/// 標準入力から1行読み取り、検証済みターゲットのリストを返す
pub(crate) fn prompt_targets() -> io::Result<Vec<Target>> {
    use std::io::Write;

    print!("Enter IP addresses or hostnames (comma separated): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(parse_targets(&line))
}
