use fxhash::FxHashMap;

use crate::config::Target;
use crate::core::stats::{SshStatus, Status, TargetStats};
use crate::tui::models::StatusMode;

/// フィルタ・ページネーション適用後の表示対象
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VisiblePage {
    /// 現在ページに表示するターゲット(登録順)
    pub(crate) items: Vec<Target>,

    /// フィルタ通過後の総ターゲット数
    pub(crate) total_filtered: usize,

    /// 総ページ数(フィルタ結果が空でも1)
    pub(crate) total_pages: usize,

    /// クランプ後の現在ページ(1始まり)
    pub(crate) page: usize,
}

/// フィルタとページネーションを適用する純関数
/// テキストフィルタはカンマ・空白区切りの複数条件で、いずれかに部分一致すれば通過する
/// ステータスフィルタはスナップショットに対して判定する
/// UpはpingがUPかつSSHがOKの両方、DownはpingがDOWNまたはSSHがNGのいずれか
pub(crate) fn visible(
    registry: &[Target],
    snapshot: &FxHashMap<Target, TargetStats>,
    query: &str,
    mode: StatusMode,
    page: usize,
    page_size: usize,
) -> VisiblePage {
    let terms: Vec<String> = query
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect();

    let filtered: Vec<&Target> = registry
        .iter()
        .filter(|target| {
            terms.is_empty() || {
                let lower = target.as_str().to_lowercase();
                terms.iter().any(|term| lower.contains(term))
            }
        })
        .filter(|target| match mode {
            StatusMode::All => true,
            StatusMode::Up => snapshot
                .get(target)
                .is_some_and(|s| s.status == Status::Up && s.ssh == SshStatus::Ok),
            StatusMode::Down => snapshot
                .get(target)
                .is_some_and(|s| s.status == Status::Down || s.ssh == SshStatus::Failed),
        })
        .collect();

    let page_size = page_size.max(1);
    let total_filtered = filtered.len();
    let total_pages = total_filtered.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let items = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    VisiblePage {
        items,
        total_filtered,
        total_pages,
        page,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::core::stats::StatsStore;

    fn targets(strs: &[&str]) -> Vec<Target> {
        strs.iter().map(|s| Target::parse(s).unwrap()).collect()
    }

    /// (ターゲット, pingがUPか, SSHチェック結果)の組からスナップショットを作る
    fn snapshot_with(
        specs: &[(&str, bool, Option<bool>)],
    ) -> (Vec<Target>, FxHashMap<Target, TargetStats>) {
        let registry = targets(&specs.iter().map(|(s, _, _)| *s).collect::<Vec<_>>());
        let store = StatsStore::new(&registry, 30);
        for (target, (_, up, ssh)) in registry.iter().zip(specs) {
            store.record_ping(target, *up, Duration::milliseconds(1));
            if let Some(ok) = ssh {
                store.record_ssh(target, *ok);
            }
        }
        (registry, store.snapshot())
    }

    #[test]
    fn test_text_filter_match_any() {
        // [正常系] カンマ区切りの複数条件はいずれかに一致すれば通過する
        let registry = targets(&["8.8.8.8", "1.1.1.1", "google.com"]);
        let snapshot = FxHashMap::default();

        let page = visible(&registry, &snapshot, "8.8, google", StatusMode::All, 1, 100);
        let strs: Vec<&str> = page.items.iter().map(Target::as_str).collect();
        assert_eq!(strs, vec!["8.8.8.8", "google.com"]);
        assert_eq!(page.total_filtered, 2);

        // [正常系] 大文字小文字を区別しない
        let page = visible(&registry, &snapshot, "GOOGLE", StatusMode::All, 1, 100);
        assert_eq!(page.items.len(), 1);

        // [正常系] 空クエリは全件通過
        let page = visible(&registry, &snapshot, "", StatusMode::All, 1, 100);
        assert_eq!(page.total_filtered, 3);

        // [正常系] 区切り文字だけのクエリも全件通過
        let page = visible(&registry, &snapshot, " , ", StatusMode::All, 1, 100);
        assert_eq!(page.total_filtered, 3);

        // [正常系] 一致なしは空
        let page = visible(&registry, &snapshot, "nothing", StatusMode::All, 1, 100);
        assert_eq!(page.total_filtered, 0);
    }

    #[test]
    fn test_status_filter_asymmetry() {
        // [正常系] UpモードはpingがUPかつSSHがOKの両方を要求する
        // DownモードはpingがDOWNまたはSSHがNGのいずれかで通過する
        let (registry, snapshot) = snapshot_with(&[
            ("healthy.example", true, Some(true)),
            ("ssh-broken.example", true, Some(false)),
            ("ping-down.example", false, Some(true)),
            ("unchecked.example", true, None),
        ]);

        let up = visible(&registry, &snapshot, "", StatusMode::Up, 1, 100);
        let strs: Vec<&str> = up.items.iter().map(Target::as_str).collect();
        assert_eq!(strs, vec!["healthy.example"]);

        let down = visible(&registry, &snapshot, "", StatusMode::Down, 1, 100);
        let strs: Vec<&str> = down.items.iter().map(Target::as_str).collect();
        assert_eq!(strs, vec!["ssh-broken.example", "ping-down.example"]);

        // [正常系] Allモードは全件
        let all = visible(&registry, &snapshot, "", StatusMode::All, 1, 100);
        assert_eq!(all.total_filtered, 4);
    }

    #[test]
    fn test_status_filter_applies_after_text_filter() {
        // [正常系] テキストフィルタ通過後にステータスフィルタが適用される
        let (registry, snapshot) = snapshot_with(&[
            ("web1.example", true, Some(true)),
            ("web2.example", false, Some(true)),
            ("db1.example", true, Some(true)),
        ]);

        let page = visible(&registry, &snapshot, "web", StatusMode::Up, 1, 100);
        let strs: Vec<&str> = page.items.iter().map(Target::as_str).collect();
        assert_eq!(strs, vec!["web1.example"]);
    }

    #[test]
    fn test_snapshot_missing_target() {
        // [正常系] スナップショットに存在しないターゲットはUp/Downの両モードで除外される
        let registry = targets(&["10.0.0.1"]);
        let snapshot = FxHashMap::default();

        assert_eq!(
            visible(&registry, &snapshot, "", StatusMode::Up, 1, 100).total_filtered,
            0
        );
        assert_eq!(
            visible(&registry, &snapshot, "", StatusMode::Down, 1, 100).total_filtered,
            0
        );
        assert_eq!(
            visible(&registry, &snapshot, "", StatusMode::All, 1, 100).total_filtered,
            1
        );
    }

    #[test]
    fn test_pagination_boundaries() {
        let snapshot = FxHashMap::default();

        // [正常系] フィルタ結果0件でも総ページ数は1、要求ページは1にクランプ
        let registry = targets(&["10.0.0.1"]);
        let page = visible(&registry, &snapshot, "nothing", StatusMode::All, 3, 100);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());

        // [正常系] 101件をページサイズ100で割ると2ページ
        let many: Vec<String> = (1..=101).map(|i| format!("host{i}.example")).collect();
        let registry = targets(&many.iter().map(String::as_str).collect::<Vec<_>>());
        let page = visible(&registry, &snapshot, "", StatusMode::All, 1, 100);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 100);
        assert_eq!(page.items[0].as_str(), "host1.example");

        // [正常系] 範囲外のページ要求は最終ページにクランプされる
        let page = visible(&registry, &snapshot, "", StatusMode::All, 5, 100);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].as_str(), "host101.example");

        // [正常系] ちょうど割り切れる場合
        let exact: Vec<String> = (1..=200).map(|i| format!("host{i}.example")).collect();
        let registry = targets(&exact.iter().map(String::as_str).collect::<Vec<_>>());
        let page = visible(&registry, &snapshot, "", StatusMode::All, 2, 100);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 100);
    }

    #[test]
    fn test_idempotence() {
        // [正常系] 同一引数・同一スナップショットなら結果は常に等しい(純関数)
        let (registry, snapshot) = snapshot_with(&[
            ("web1.example", true, Some(true)),
            ("web2.example", false, None),
        ]);

        let first = visible(&registry, &snapshot, "web", StatusMode::All, 1, 1);
        let second = visible(&registry, &snapshot, "web", StatusMode::All, 1, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_registry_order_preserved() {
        // [正常系] 結果は登録順のまま並べ替えられない
        let registry = targets(&["zeta.example", "alpha.example", "mid.example"]);
        let snapshot = FxHashMap::default();
        let page = visible(&registry, &snapshot, "", StatusMode::All, 1, 100);
        let strs: Vec<&str> = page.items.iter().map(Target::as_str).collect();
        assert_eq!(strs, vec!["zeta.example", "alpha.example", "mid.example"]);
    }
}
