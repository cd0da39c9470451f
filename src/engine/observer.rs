use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::RuleEngine;
use crate::types::{Rule, RuleError};

pub type DynRuleObserver = Arc<dyn RuleObserver>;

/// 规则存储的变更通知
#[async_trait]
pub trait RuleObserver: Send + Sync {
    /// 启动时的全量规则
    async fn on_rule_load(&self, rules: Vec<Rule>) -> Result<(), RuleError> {
        for rule in rules {
            self.on_rule_added(rule).await?;
        }
        Ok(())
    }

    async fn on_rule_added(&self, rule: Rule) -> Result<(), RuleError>;

    /// 规则被修改, 默认按删除后重新添加处理
    async fn on_rule_changed(&self, rule: Rule) -> Result<(), RuleError> {
        self.on_rule_removed(&rule).await;
        self.on_rule_added(rule).await
    }

    async fn on_rule_removed(&self, rule: &Rule);

    /// 规则存储写入或更新规则失败
    async fn on_rule_error(&self, error: &RuleError, rule: &Rule) {
        warn!("规则 [{}] {} 存储失败: {}", rule.id, rule.name, error);
    }
}

#[async_trait]
impl RuleObserver for RuleEngine {
    async fn on_rule_load(&self, rules: Vec<Rule>) -> Result<(), RuleError> {
        self.load_rules(rules).await.map(|_| ())
    }

    async fn on_rule_added(&self, rule: Rule) -> Result<(), RuleError> {
        self.add_rule(rule).await
    }

    async fn on_rule_changed(&self, rule: Rule) -> Result<(), RuleError> {
        self.change_rule(rule).await
    }

    async fn on_rule_removed(&self, rule: &Rule) {
        self.remove_rule(rule.id).await;
    }
}
