use regex::Regex;
use tracing::debug;

use crate::aop::InterceptorManager;
use crate::components::{Action, ActionFactory};
use crate::tree::{ElementNode, RelativePath};
use crate::types::{MatchMiss, Rule, RuleError, Transition, TransitionKind};

/// 已启用规则的运行时状态: 规则本身、编译后的匹配条件、动作实例和触发标志
///
/// 动作只在创建运行时时构造一次。`triggered` 是边沿检测的唯一状态:
/// 为 true 时表示上一次事件已经对该规则执行过 seen。
#[derive(Debug)]
pub struct RuleRuntime {
    rule: Rule,
    complete_view_id: String,
    text_pattern: Option<Regex>,
    path: RelativePath,
    action: Action,
    triggered: bool,
}

impl RuleRuntime {
    pub fn new(rule: Rule, factory: &ActionFactory) -> Result<Self, RuleError> {
        rule.validate()?;
        let text_pattern = rule.text_pattern()?;
        let path = RelativePath::parse(rule.relative_path.as_deref());
        let action = factory.build(rule.action_type)?;
        Ok(Self {
            complete_view_id: rule.complete_view_id(),
            rule,
            text_pattern,
            path,
            action,
            triggered: false,
        })
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// 没有文本时按空串匹配
    pub fn text_matches(&self, text: Option<&str>) -> bool {
        match &self.text_pattern {
            Some(pattern) => pattern.is_match(text.unwrap_or_default()),
            None => true,
        }
    }

    /// 针对一次树变化评估本规则, 发生跳变时返回对应的记录
    pub async fn evaluate<N: ElementNode>(
        &mut self,
        app_id: &str,
        root: &N,
        interceptors: &InterceptorManager,
    ) -> Option<Transition> {
        if !self.rule.matches_app(app_id) {
            return None;
        }

        let candidates = root.find_by_view_id(&self.complete_view_id);
        // 只有恰好一个候选时才认为元素可见; 多个候选同样视为不可见
        let candidate = match candidates.as_slice() {
            [candidate] => candidate,
            _ => {
                if self.triggered {
                    return self.release(interceptors).await;
                }
                let miss = if candidates.is_empty() {
                    MatchMiss::NoCandidate
                } else {
                    MatchMiss::Ambiguous(candidates.len())
                };
                interceptors.missed(&self.rule, &miss).await;
                return None;
            }
        };

        if self.triggered {
            return None;
        }

        let text = candidate.text();
        if !self.text_matches(text.as_deref()) {
            debug!("规则 [{}] 实际文本: {:?}", self.rule.id, text);
            interceptors
                .missed(&self.rule, &MatchMiss::TextMismatch)
                .await;
            return None;
        }

        let Some(target) = self.path.resolve(candidate) else {
            interceptors
                .missed(&self.rule, &MatchMiss::PathUnresolved)
                .await;
            return None;
        };

        self.triggered = true;
        interceptors.seen(&self.rule).await;
        if let Err(e) = self.action.on_seen(&target).await {
            interceptors.failed(&self.rule, &e).await;
        }
        Some(Transition::new(self.rule.id, TransitionKind::Seen))
    }

    /// 已触发时清除标志并执行 gone
    pub async fn release(&mut self, interceptors: &InterceptorManager) -> Option<Transition> {
        if !self.triggered {
            return None;
        }
        self.triggered = false;
        interceptors.gone(&self.rule).await;
        if let Err(e) = self.action.on_gone().await {
            interceptors.failed(&self.rule, &e).await;
        }
        Some(Transition::new(self.rule.id, TransitionKind::Gone))
    }
}
