use crate::types::{MatchMiss, Rule, RuleError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 规则状态跳变拦截器, 用于观察引擎在每次事件中的决策
///
/// 所有方法都有空的默认实现, 只需覆盖关心的阶段。
#[async_trait]
pub trait TransitionInterceptor: Send + Sync + std::fmt::Debug {
    /// 规则被触发(seen), 在动作执行之前调用
    async fn seen(&self, _rule: &Rule) {}

    /// 规则失效(gone), 在动作执行之前调用
    async fn gone(&self, _rule: &Rule) {}

    /// 规则在本次事件中未触发
    ///
    /// # Arguments
    /// * `rule` - 当前规则
    /// * `miss` - 未触发的原因
    async fn missed(&self, _rule: &Rule, _miss: &MatchMiss) {}

    /// 动作执行失败
    async fn failed(&self, _rule: &Rule, _error: &RuleError) {}
}

/// 拦截器管理器, 按注册顺序调用所有拦截器
#[derive(Debug, Default)]
pub struct InterceptorManager {
    interceptors: Vec<Arc<dyn TransitionInterceptor>>,
}

impl InterceptorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, interceptor: Arc<dyn TransitionInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub async fn seen(&self, rule: &Rule) {
        for interceptor in &self.interceptors {
            interceptor.seen(rule).await;
        }
    }

    pub async fn gone(&self, rule: &Rule) {
        for interceptor in &self.interceptors {
            interceptor.gone(rule).await;
        }
    }

    pub async fn missed(&self, rule: &Rule, miss: &MatchMiss) {
        for interceptor in &self.interceptors {
            interceptor.missed(rule, miss).await;
        }
    }

    pub async fn failed(&self, rule: &Rule, error: &RuleError) {
        for interceptor in &self.interceptors {
            interceptor.failed(rule, error).await;
        }
    }
}

/// 日志拦截器, 引擎默认注册
#[derive(Debug)]
pub struct LoggingInterceptor;

#[async_trait]
impl TransitionInterceptor for LoggingInterceptor {
    async fn seen(&self, rule: &Rule) {
        info!(
            "触发(seen)规则 [{}] {}, 动作: {}",
            rule.id, rule.name, rule.action_type
        );
    }

    async fn gone(&self, rule: &Rule) {
        info!("触发(gone)规则 [{}] {}", rule.id, rule.name);
    }

    async fn missed(&self, rule: &Rule, miss: &MatchMiss) {
        match miss {
            MatchMiss::PathUnresolved => warn!(
                "规则 [{}] 的相对路径 {:?} 无法解析",
                rule.id, rule.relative_path
            ),
            MatchMiss::TextMismatch => debug!(
                "规则 [{}] 期望文本 {:?} 不匹配",
                rule.id, rule.view_text
            ),
            other => debug!("规则 [{}] 未触发: {:?}", rule.id, other),
        }
    }

    async fn failed(&self, rule: &Rule, error: &RuleError) {
        warn!("规则 [{}] 的动作执行失败: {}", rule.id, error);
    }
}
