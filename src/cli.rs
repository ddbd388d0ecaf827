use std::path::PathBuf;

use clap::Parser;

use crate::tui::models::StatusMode;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(version, about = "Reachability and Service Monitoring Tool")]
pub(crate) struct Cli {
    /// 監視対象のIPアドレスまたはホスト名
    /// カンマ区切りの1引数でも複数引数でも指定可能
    pub(crate) targets: Vec<String>,

    /// Ping送信間隔(秒)
    #[clap(long, short)]
    pub(crate) interval: Option<f64>,

    /// 稼働率計算のスライディングウィンドウサイズ
    #[clap(long, short)]
    pub(crate) window: Option<usize>,

    /// UIの再描画間隔(秒)
    #[clap(long, short)]
    pub(crate) refresh: Option<f64>,

    /// ターゲットの初期テキストフィルタ
    /// カンマ・空白区切りで複数条件(いずれかに一致)
    #[clap(long, short)]
    pub(crate) filter: Option<String>,

    /// 到達性によるフィルタモード
    #[clap(long, short, value_enum)]
    pub(crate) status: Option<StatusMode>,

    /// 1ページあたりの表示ターゲット数
    #[clap(long)]
    pub(crate) page_size: Option<usize>,

    /// SSHポートチェックの周回間隔(秒)
    #[clap(long)]
    pub(crate) ssh_interval: Option<f64>,

    /// SSHチェックに使用するTCPポート
    #[clap(long)]
    pub(crate) ssh_port: Option<u16>,

    /// ターゲット未指定時に対話プロンプトを出さずに終了する
    #[clap(long)]
    pub(crate) no_prompt: bool,

    /// 設定ファイル(TOML)のパス
    #[clap(long, short)]
    pub(crate) config: Option<PathBuf>,
}

impl Cli {
    pub(crate) fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
