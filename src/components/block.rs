use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::host::{OverlayId, OverlayManager};
use crate::tree::ElementNode;
use crate::types::{Rect, RuleError, ScreenMetrics};

/// 一次覆盖周期: 循环是否仍在运行, 以及取消信号的发送端
#[derive(Debug)]
struct RefreshCycle {
    running: Arc<AtomicBool>,
    cancel: oneshot::Sender<()>,
}

/// 遮挡动作: 在节点上方显示不透明覆盖层, 并周期性跟随节点移动和缩放
///
/// 覆盖层由后台刷新循环负责移除: 节点 refresh 失败时循环自行结束。
/// 循环只持有取消信号的接收端和节点句柄, 不持有动作本身; 动作被丢弃时
/// 发送端随之关闭, 循环在下一次唤醒时移除覆盖层并退出。
pub struct BlockAction {
    overlays: Arc<dyn OverlayManager>,
    screen: Option<ScreenMetrics>,
    period: Duration,
    cycle: Option<RefreshCycle>,
}

impl BlockAction {
    pub fn new(
        overlays: Arc<dyn OverlayManager>,
        screen: Option<ScreenMetrics>,
        period: Duration,
    ) -> Self {
        Self {
            overlays,
            screen,
            period,
            cycle: None,
        }
    }

    /// 刷新循环是否仍在运行
    pub fn is_active(&self) -> bool {
        self.cycle
            .as_ref()
            .is_some_and(|c| c.running.load(Ordering::SeqCst))
    }

    /// 显示覆盖层并启动刷新循环; 已在运行时忽略
    ///
    /// 必须在 tokio 运行时中调用。
    pub fn on_seen<N: ElementNode>(&mut self, node: &N) -> Result<(), RuleError> {
        if self.is_active() {
            debug!("覆盖层已显示, 忽略重复触发");
            return Ok(());
        }

        let bounds = node.bounds_in_screen();
        let initial = if bounds_acceptable(self.screen, &bounds) {
            bounds
        } else {
            warn!("初始边界无效 {:?}, 覆盖层以空尺寸显示", bounds);
            Rect::EMPTY
        };
        let overlay = self.overlays.show(initial)?;

        let running = Arc::new(AtomicBool::new(true));
        let (cancel, cancelled) = oneshot::channel();
        let refresher = OverlayRefresher {
            node: node.clone(),
            overlay,
            overlays: self.overlays.clone(),
            screen: self.screen,
            period: self.period,
            running: running.clone(),
        };
        tokio::spawn(refresher.run(cancelled));
        self.cycle = Some(RefreshCycle { running, cancel });
        Ok(())
    }

    /// 覆盖层的移除由刷新循环完成
    pub fn on_gone(&self) {}

    /// 立即停止刷新循环, 覆盖层在循环下一次唤醒时移除
    pub fn cancel(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            cycle.running.store(false, Ordering::SeqCst);
            // 接收端已经退出时发送失败, 可以忽略
            let _ = cycle.cancel.send(());
            debug!("覆盖层刷新循环已取消");
        }
    }
}

impl Drop for BlockAction {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for BlockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockAction")
            .field("screen", &self.screen)
            .field("period", &self.period)
            .field("active", &self.is_active())
            .finish()
    }
}

struct OverlayRefresher<N> {
    node: N,
    overlay: OverlayId,
    overlays: Arc<dyn OverlayManager>,
    screen: Option<ScreenMetrics>,
    period: Duration,
    running: Arc<AtomicBool>,
}

impl<N: ElementNode> OverlayRefresher<N> {
    async fn run(self, mut cancelled: oneshot::Receiver<()>) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut cancelled => {
                    debug!("覆盖层 {:?} 的所有者已释放, 停止刷新", self.overlay);
                    break;
                }
                _ = ticker.tick() => {
                    if !self.node.refresh() {
                        debug!("节点已消失, 移除覆盖层 {:?}", self.overlay);
                        break;
                    }
                    self.reposition();
                }
            }
        }

        self.overlays.remove(self.overlay);
        self.running.store(false, Ordering::SeqCst);
    }

    fn reposition(&self) {
        let bounds = self.node.bounds_in_screen();
        if !bounds_acceptable(self.screen, &bounds) {
            warn!("边界无效 {:?}, 保持覆盖层当前位置", bounds);
            return;
        }
        if let Err(e) = self.overlays.update(self.overlay, bounds) {
            warn!("更新覆盖层失败: {}", e);
        }
    }
}

/// 宽高必须为正; 已知屏幕尺寸时还不能超过屏幕
pub fn bounds_acceptable(screen: Option<ScreenMetrics>, bounds: &Rect) -> bool {
    match screen {
        Some(screen) => screen.accepts(bounds),
        None => bounds.width() > 0 && bounds.height() > 0,
    }
}
