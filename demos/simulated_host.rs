use a11y_rules::host::{ActionPrimitives, DryRunHost};
use a11y_rules::tree::{ElementNode, MemoryTree, NodeSpec};
use a11y_rules::{EngineConfig, Rect, RuleEngine, ScreenMetrics};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const APP: &str = "com.example.video";

// 规则定义, 与规则存储导出的格式一致
const RULES: &str = r#"[
    {
        "id": 1,
        "name": "跳过开屏广告",
        "app_id": "com.example.video",
        "view_id": "skip_text",
        "view_text": "跳过( \\d+)?",
        "action_type": "click"
    },
    {
        "id": 2,
        "name": "广告静音",
        "app_id": "com.example.video",
        "view_id": "ad_badge",
        "action_type": "mute"
    },
    {
        "id": 3,
        "name": "遮挡推荐位",
        "app_id": "com.example.video",
        "view_id": "promo_title",
        "relative_path": "p",
        "action_type": "block"
    }
]"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志, 默认 debug 级别, 可通过 RUST_LOG 覆盖
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let host = Arc::new(DryRunHost::new());
    let primitives = ActionPrimitives::from_host(host.clone(), Some(ScreenMetrics::new(1080, 1920)));
    let engine = RuleEngine::new(primitives, EngineConfig::default());

    let count = engine.load_rules_json(RULES).await?;
    info!("已加载 {} 条规则, 监听应用: {:?}", count, engine.active_apps());

    // 开屏页: 可点击的容器里有一个倒计时文本
    let tree = MemoryTree::new();
    let root = tree.root();
    let splash = tree.add_child(&root, NodeSpec::new().clickable(true));
    let skip = tree.add_child(
        &splash,
        NodeSpec::new()
            .view_id(format!("{}:id/skip_text", APP))
            .text("跳过 5"),
    );
    let transitions = engine.on_tree_changed(APP, Some(&root)).await;
    info!("开屏页: {:?}", transitions);
    info!("容器被点击 {} 次", tree.click_count(&splash));

    // 倒计时刷新不会重复点击
    tree.set_text(&skip, Some("跳过 4"));
    engine.on_tree_changed(APP, Some(&root)).await;

    // 进入首页: 开屏消失, 出现广告角标和推荐位
    tree.detach(&splash);
    let badge = tree.add_child(
        &root,
        NodeSpec::new().view_id(format!("{}:id/ad_badge", APP)),
    );
    let promo = tree.add_child(&root, NodeSpec::new().bounds(Rect::new(0, 400, 1080, 800)));
    tree.add_child(
        &promo,
        NodeSpec::new().view_id(format!("{}:id/promo_title", APP)),
    );
    let transitions = engine.on_tree_changed(APP, Some(&root)).await;
    info!("首页: {:?}", transitions);

    // 推荐位滚动, 覆盖层跟随
    for offset in [100, 200, 300] {
        tree.set_bounds(&promo, Rect::new(0, 400 - offset, 1080, 800 - offset));
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    // 广告结束, 推荐位滚出屏幕
    tree.detach(&badge);
    tree.detach(&promo);
    tokio::time::sleep(Duration::from_millis(25)).await;
    let transitions = engine.on_tree_changed(APP, Some(&root)).await;
    info!("广告结束: {:?}", transitions);
    info!("根节点剩余 {} 个子节点", root.child_count());

    for actuation in host.actuations() {
        info!("宿主操作: {:?}", actuation);
    }
    Ok(())
}
