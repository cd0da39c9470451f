use std::collections::BTreeSet;
use tokio::sync::watch;
use tracing::debug;

use crate::types::Rule;

/// 维护"存在已启用规则的应用"集合, 供事件源缩小监听范围
///
/// 这只是优化, 引擎自身的 app_id 过滤才是正确性的保证。
#[derive(Debug)]
pub struct ActiveAppTracker {
    apps: watch::Sender<BTreeSet<String>>,
}

impl Default for ActiveAppTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveAppTracker {
    pub fn new() -> Self {
        let (apps, _) = watch::channel(BTreeSet::new());
        Self { apps }
    }

    /// 根据当前规则重新计算, 集合发生变化时返回 true 并通知订阅者
    pub fn recompute<'a>(&self, rules: impl IntoIterator<Item = &'a Rule>) -> bool {
        let next: BTreeSet<String> = rules
            .into_iter()
            .filter(|rule| rule.enabled)
            .map(|rule| rule.app_id.clone())
            .collect();
        let changed = self.apps.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        if changed {
            debug!("监听的应用更新为: {:?}", *self.apps.borrow());
        }
        changed
    }

    pub fn snapshot(&self) -> BTreeSet<String> {
        self.apps.borrow().clone()
    }

    pub fn contains(&self, app_id: &str) -> bool {
        self.apps.borrow().contains(app_id)
    }

    pub fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.apps.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionType;

    #[test]
    fn deduplicates_enabled_apps() {
        let tracker = ActiveAppTracker::new();
        let rules = vec![
            Rule::new(1, "a", "com.one", "x", ActionType::Click),
            Rule::new(2, "b", "com.one", "y", ActionType::Back),
            Rule::new(3, "c", "com.two", "z", ActionType::Mute).with_enabled(false),
        ];
        assert!(tracker.recompute(&rules));
        assert_eq!(
            tracker.snapshot().into_iter().collect::<Vec<_>>(),
            vec!["com.one".to_string()]
        );
        assert!(!tracker.contains("com.two"));
        // 再次计算同样的集合不算变化
        assert!(!tracker.recompute(&rules));
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let tracker = ActiveAppTracker::new();
        let mut rx = tracker.subscribe();
        let rules = vec![Rule::new(1, "a", "com.one", "x", ActionType::Click)];
        tracker.recompute(&rules);
        rx.changed().await.unwrap();
        assert!(rx.borrow().contains("com.one"));
    }
}
