mod common;

use a11y_rules::host::{Actuation, DryRunHost, OverlayId};
use a11y_rules::tree::{MemoryNode, MemoryTree, NodeSpec};
use a11y_rules::{ActionType, BlockAction, Rect, Rule};
use common::{screen, Fixture, APP};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_test::assert_ok;

const PERIOD: Duration = Duration::from_millis(10);

fn setup(bounds: Rect) -> (Arc<DryRunHost>, MemoryTree, MemoryNode, BlockAction) {
    let host = Arc::new(DryRunHost::new());
    let tree = MemoryTree::new();
    let node = tree.add_child(&tree.root(), NodeSpec::new().view_id("app:id/ad").bounds(bounds));
    let block = BlockAction::new(host.clone(), Some(screen()), PERIOD);
    (host, tree, node, block)
}

#[tokio::test(start_paused = true)]
async fn overlay_follows_node_until_it_disappears() {
    let r0 = Rect::new(0, 0, 400, 400);
    let (host, tree, node, mut block) = setup(r0);
    assert_ok!(block.on_seen(&node));
    assert!(block.is_active());

    let shrinking = [
        Rect::new(0, 0, 300, 300),
        Rect::new(0, 0, 200, 200),
        Rect::new(0, 0, 100, 100),
    ];
    // 错开半个周期, 每次等待恰好经过一次刷新
    sleep(PERIOD / 2).await;
    for bounds in shrinking {
        tree.set_bounds(&node, bounds);
        sleep(PERIOD).await;
    }
    tree.detach(&node);
    sleep(PERIOD).await;
    sleep(PERIOD * 5).await;

    let id = OverlayId(0);
    assert_eq!(
        host.actuations(),
        vec![
            Actuation::OverlayShown { id, bounds: r0 },
            Actuation::OverlayUpdated { id, bounds: shrinking[0] },
            Actuation::OverlayUpdated { id, bounds: shrinking[1] },
            Actuation::OverlayUpdated { id, bounds: shrinking[2] },
            Actuation::OverlayRemoved { id },
        ]
    );
    assert_eq!(host.open_overlays(), 0);
    assert!(!block.is_active());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_action_stops_the_loop() {
    let r0 = Rect::new(10, 10, 200, 200);
    let (host, _tree, node, mut block) = setup(r0);
    assert_ok!(block.on_seen(&node));

    drop(block);
    sleep(PERIOD * 3).await;

    let id = OverlayId(0);
    assert_eq!(
        host.actuations(),
        vec![
            Actuation::OverlayShown { id, bounds: r0 },
            Actuation::OverlayRemoved { id },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn degenerate_bounds_keep_last_geometry() {
    let r0 = Rect::new(0, 0, 100, 100);
    let (host, tree, node, mut block) = setup(r0);
    assert_ok!(block.on_seen(&node));

    sleep(PERIOD / 2).await;
    tree.set_bounds(&node, Rect::new(50, 50, 50, 80));
    sleep(PERIOD).await;
    tree.set_bounds(&node, Rect::new(0, 0, 5000, 100));
    sleep(PERIOD).await;
    let valid = Rect::new(20, 20, 120, 120);
    tree.set_bounds(&node, valid);
    sleep(PERIOD).await;
    block.cancel();
    sleep(PERIOD).await;

    let id = OverlayId(0);
    assert_eq!(
        host.actuations(),
        vec![
            Actuation::OverlayShown { id, bounds: r0 },
            Actuation::OverlayUpdated { id, bounds: valid },
            Actuation::OverlayRemoved { id },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn extreme_bounds_are_rejected_without_stopping_the_loop() {
    let r0 = Rect::new(0, 0, 100, 100);
    let (host, tree, node, mut block) = setup(r0);
    assert_ok!(block.on_seen(&node));

    sleep(PERIOD / 2).await;
    tree.set_bounds(&node, Rect::new(i32::MIN, 0, i32::MAX, 100));
    sleep(PERIOD).await;
    tree.set_bounds(&node, Rect::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN));
    sleep(PERIOD).await;
    assert!(block.is_active());

    let valid = Rect::new(10, 10, 60, 60);
    tree.set_bounds(&node, valid);
    sleep(PERIOD).await;
    tree.detach(&node);
    sleep(PERIOD).await;

    let id = OverlayId(0);
    assert_eq!(
        host.actuations(),
        vec![
            Actuation::OverlayShown { id, bounds: r0 },
            Actuation::OverlayUpdated { id, bounds: valid },
            Actuation::OverlayRemoved { id },
        ]
    );
    assert_eq!(host.open_overlays(), 0);
    assert!(!block.is_active());
}

#[tokio::test(start_paused = true)]
async fn invalid_initial_bounds_show_empty_overlay() {
    let (host, _tree, node, mut block) = setup(Rect::EMPTY);
    assert_ok!(block.on_seen(&node));
    assert_eq!(
        host.actuations(),
        vec![Actuation::OverlayShown {
            id: OverlayId(0),
            bounds: Rect::EMPTY
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn repeated_seen_while_active_is_ignored() {
    let r0 = Rect::new(0, 0, 100, 100);
    let (host, tree, node, mut block) = setup(r0);
    assert_ok!(block.on_seen(&node));
    assert_ok!(block.on_seen(&node));
    assert_eq!(host.open_overlays(), 1);

    tree.detach(&node);
    sleep(PERIOD * 2).await;
    assert!(!block.is_active());
    assert_eq!(host.open_overlays(), 0);

    // 循环结束后可以重新显示
    let again = tree.add_child(&tree.root(), NodeSpec::new().bounds(r0));
    assert_ok!(block.on_seen(&again));
    assert_eq!(host.open_overlays(), 1);
    assert!(host.actuations().contains(&Actuation::OverlayShown {
        id: OverlayId(1),
        bounds: r0
    }));
}

#[tokio::test(start_paused = true)]
async fn removing_block_rule_removes_overlay() {
    let fx = Fixture::new().await;
    let ad = fx.add_view("ad_banner");
    fx.tree.set_bounds(&ad, Rect::new(0, 1500, 1080, 1920));
    assert_ok!(
        fx.engine
            .add_rule(Rule::new(11, "cover ad", APP, "ad_banner", ActionType::Block))
            .await
    );

    fx.fire().await;
    assert_eq!(fx.host.open_overlays(), 1);

    assert!(fx.engine.remove_rule(11).await);
    sleep(PERIOD).await;
    assert_eq!(fx.host.open_overlays(), 0);
}

#[tokio::test(start_paused = true)]
async fn overlay_is_removed_when_node_leaves_tree() {
    let fx = Fixture::new().await;
    let ad = fx.add_view("ad_banner");
    fx.tree.set_bounds(&ad, Rect::new(0, 1500, 1080, 1920));
    assert_ok!(
        fx.engine
            .add_rule(Rule::new(11, "cover ad", APP, "ad_banner", ActionType::Block))
            .await
    );
    fx.fire().await;

    fx.tree.detach(&ad);
    sleep(PERIOD * 2).await;
    assert_eq!(fx.host.open_overlays(), 0);
    // 规则仍处于已触发状态, 直到下一次事件
    assert_eq!(fx.engine.is_triggered(11).await, Some(true));
    fx.fire().await;
    assert_eq!(fx.engine.is_triggered(11).await, Some(false));
}
