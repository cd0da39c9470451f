#![allow(dead_code)]

use a11y_rules::aop::TransitionInterceptor;
use a11y_rules::host::{ActionPrimitives, DryRunHost};
use a11y_rules::tree::{MemoryNode, MemoryTree, NodeSpec};
use a11y_rules::{EngineConfig, MatchMiss, Rect, Rule, RuleEngine, RuleError, ScreenMetrics};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub const APP: &str = "com.example.video";

pub fn screen() -> ScreenMetrics {
    ScreenMetrics::new(1080, 1920)
}

/// 引擎、记录型宿主和一棵只有根节点的树
pub struct Fixture {
    pub engine: RuleEngine,
    pub host: Arc<DryRunHost>,
    pub tree: MemoryTree,
    pub events: Arc<RecordingInterceptor>,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    pub async fn with_config(config: EngineConfig) -> Self {
        let host = Arc::new(DryRunHost::new());
        let primitives = ActionPrimitives::from_host(host.clone(), Some(screen()));
        let engine = RuleEngine::new(primitives, config);
        let events = Arc::new(RecordingInterceptor::default());
        engine.add_interceptor(events.clone()).await;
        Self {
            engine,
            host,
            tree: MemoryTree::new(),
            events,
        }
    }

    pub fn root(&self) -> MemoryNode {
        self.tree.root()
    }

    /// 在根节点下添加一个带完整 id 的元素
    pub fn add_view(&self, view_id: &str) -> MemoryNode {
        self.tree.add_child(
            &self.root(),
            NodeSpec::new()
                .view_id(format!("{}:id/{}", APP, view_id))
                .bounds(Rect::new(100, 100, 300, 200)),
        )
    }

    pub async fn fire(&self) -> Vec<a11y_rules::Transition> {
        self.engine.on_tree_changed(APP, Some(&self.root())).await
    }
}

/// 按顺序记录拦截器收到的事件
#[derive(Debug, Default)]
pub struct RecordingInterceptor {
    events: Mutex<Vec<String>>,
}

impl RecordingInterceptor {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl TransitionInterceptor for RecordingInterceptor {
    async fn seen(&self, rule: &Rule) {
        self.push(format!("seen:{}", rule.id));
    }

    async fn gone(&self, rule: &Rule) {
        self.push(format!("gone:{}", rule.id));
    }

    async fn missed(&self, rule: &Rule, miss: &MatchMiss) {
        self.push(format!("missed:{}:{:?}", rule.id, miss));
    }

    async fn failed(&self, rule: &Rule, error: &RuleError) {
        self.push(format!("failed:{}:{}", rule.id, error));
    }
}
