use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use super::{ActiveAppTracker, RuleRuntime};
use crate::aop::{InterceptorManager, LoggingInterceptor, TransitionInterceptor};
use crate::components::ActionFactory;
use crate::host::ActionPrimitives;
use crate::tree::ElementNode;
use crate::types::{EngineConfig, Rule, RuleError, Transition};

/// 规则引擎: 持有所有已启用规则的运行时, 在每次树变化时依次评估
///
/// 运行时集合由读写锁保护, 规则的增删与正在进行的评估互斥。
#[derive(Debug, Clone)]
pub struct RuleEngine {
    runtimes: Arc<RwLock<Vec<RuleRuntime>>>,
    factory: Arc<ActionFactory>,
    apps: Arc<ActiveAppTracker>,
    interceptor_manager: Arc<RwLock<InterceptorManager>>,
}

impl RuleEngine {
    pub fn new(primitives: ActionPrimitives, config: EngineConfig) -> Self {
        let mut interceptors = InterceptorManager::new();
        // 注册日志拦截器
        interceptors.register(Arc::new(LoggingInterceptor));

        Self {
            runtimes: Arc::new(RwLock::new(Vec::new())),
            factory: Arc::new(ActionFactory::new(primitives, config)),
            apps: Arc::new(ActiveAppTracker::new()),
            interceptor_manager: Arc::new(RwLock::new(interceptors)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.factory.config()
    }

    pub async fn add_interceptor(&self, interceptor: Arc<dyn TransitionInterceptor>) {
        self.interceptor_manager.write().await.register(interceptor);
    }

    /// 处理一次树变化通知
    ///
    /// # Arguments
    /// * `app_id` - 产生事件的应用
    /// * `root` - 当前窗口的根节点, 宿主可能给不出根节点, 此时不做任何处理
    ///
    /// # Returns
    /// * 本次事件中发生的全部状态跳变, 按规则加载顺序排列
    pub async fn on_tree_changed<N: ElementNode>(
        &self,
        app_id: &str,
        root: Option<&N>,
    ) -> Vec<Transition> {
        let Some(root) = root else {
            warn!("应用 {} 的事件没有根节点, 忽略", app_id);
            return Vec::new();
        };

        let interceptors = self.interceptor_manager.read().await;
        let mut runtimes = self.runtimes.write().await;
        let mut transitions = Vec::new();
        for runtime in runtimes.iter_mut() {
            if let Some(transition) = runtime.evaluate(app_id, root, &interceptors).await {
                transitions.push(transition);
            }
        }
        transitions
    }

    /// 添加规则。未启用的规则不会构造动作; 已存在同 id 的规则时原地替换
    pub async fn add_rule(&self, rule: Rule) -> Result<(), RuleError> {
        if !rule.enabled {
            debug!("规则 [{}] {} 未启用, 忽略", rule.id, rule.name);
            self.remove_rule(rule.id).await;
            return Ok(());
        }

        let runtime = RuleRuntime::new(rule, &self.factory)?;
        let interceptors = self.interceptor_manager.read().await;
        let mut runtimes = self.runtimes.write().await;
        self.install(&mut runtimes, runtime, &interceptors).await;
        self.apps.recompute(runtimes.iter().map(RuleRuntime::rule));
        Ok(())
    }

    /// 删除规则, 返回规则是否存在
    pub async fn remove_rule(&self, rule_id: i64) -> bool {
        let interceptors = self.interceptor_manager.read().await;
        let mut runtimes = self.runtimes.write().await;
        let Some(position) = runtimes.iter().position(|r| r.rule().id == rule_id) else {
            return false;
        };
        let mut runtime = runtimes.remove(position);
        self.retire(&mut runtime, &interceptors).await;
        self.apps.recompute(runtimes.iter().map(RuleRuntime::rule));
        info!("规则 [{}] 已删除", rule_id);
        true
    }

    /// 规则被编辑: 先删除再添加
    pub async fn change_rule(&self, rule: Rule) -> Result<(), RuleError> {
        self.remove_rule(rule.id).await;
        self.add_rule(rule).await
    }

    /// 批量加载规则。先为所有已启用规则构建运行时, 任何一条失败则一条都不加载
    pub async fn load_rules(&self, rules: Vec<Rule>) -> Result<usize, RuleError> {
        let built = rules
            .into_iter()
            .filter(|rule| rule.enabled)
            .map(|rule| RuleRuntime::new(rule, &self.factory))
            .collect::<Result<Vec<_>, _>>()?;

        let count = built.len();
        let interceptors = self.interceptor_manager.read().await;
        let mut runtimes = self.runtimes.write().await;
        for runtime in built {
            self.install(&mut runtimes, runtime, &interceptors).await;
        }
        self.apps.recompute(runtimes.iter().map(RuleRuntime::rule));
        info!("已加载 {} 条规则", count);
        Ok(count)
    }

    /// 从 JSON 数组加载规则
    pub async fn load_rules_json(&self, content: &str) -> Result<usize, RuleError> {
        let rules: Vec<Rule> = serde_json::from_str(content)?;
        self.load_rules(rules).await
    }

    pub async fn load_rules_from_file(&self, path: impl AsRef<Path>) -> Result<usize, RuleError> {
        let content = tokio::fs::read_to_string(path).await?;
        self.load_rules_json(&content).await
    }

    /// 已加载的规则, 按加载顺序
    pub async fn rules(&self) -> Vec<Rule> {
        self.runtimes
            .read()
            .await
            .iter()
            .map(|r| r.rule().clone())
            .collect()
    }

    /// 规则是否处于已触发状态, 规则不存在时返回 None
    pub async fn is_triggered(&self, rule_id: i64) -> Option<bool> {
        self.runtimes
            .read()
            .await
            .iter()
            .find(|r| r.rule().id == rule_id)
            .map(RuleRuntime::is_triggered)
    }

    /// 当前存在已启用规则的应用
    pub fn active_apps(&self) -> BTreeSet<String> {
        self.apps.snapshot()
    }

    pub fn subscribe_active_apps(&self) -> watch::Receiver<BTreeSet<String>> {
        self.apps.subscribe()
    }

    async fn install(
        &self,
        runtimes: &mut Vec<RuleRuntime>,
        runtime: RuleRuntime,
        interceptors: &InterceptorManager,
    ) {
        let id = runtime.rule().id;
        match runtimes.iter().position(|r| r.rule().id == id) {
            Some(position) => {
                let mut old = std::mem::replace(&mut runtimes[position], runtime);
                self.retire(&mut old, interceptors).await;
                info!("规则 [{}] 已替换", id);
            }
            None => {
                info!("规则 [{}] {} 已添加", id, runtime.rule().name);
                runtimes.push(runtime);
            }
        }
    }

    /// 规则离开引擎前的清理; 丢弃运行时会一并停止覆盖层刷新循环
    async fn retire(&self, runtime: &mut RuleRuntime, interceptors: &InterceptorManager) {
        if runtime.is_triggered() && self.config().force_gone_on_remove {
            runtime.release(interceptors).await;
        }
    }
}
