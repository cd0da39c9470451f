use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use super::{AudioControl, Gesture, GestureDispatcher, GlobalNavigator, OverlayId, OverlayManager};
use crate::types::{Rect, RuleError};

/// 宿主执行过的一次操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actuation {
    Gesture(Gesture),
    Mute,
    Unmute,
    Back,
    OverlayShown { id: OverlayId, bounds: Rect },
    OverlayUpdated { id: OverlayId, bounds: Rect },
    OverlayRemoved { id: OverlayId },
}

/// 只记录不执行的宿主, 每次操作都写日志
#[derive(Debug, Default)]
pub struct DryRunHost {
    log: Mutex<Vec<Actuation>>,
    open_overlays: Mutex<HashSet<OverlayId>>,
    next_overlay: AtomicU64,
    reject_gestures: AtomicBool,
    reject_back: AtomicBool,
}

impl DryRunHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟宿主拒绝手势分发
    pub fn set_reject_gestures(&self, reject: bool) {
        self.reject_gestures.store(reject, Ordering::SeqCst);
    }

    pub fn set_reject_back(&self, reject: bool) {
        self.reject_back.store(reject, Ordering::SeqCst);
    }

    pub fn actuations(&self) -> Vec<Actuation> {
        lock(&self.log).clone()
    }

    pub fn clear(&self) {
        lock(&self.log).clear();
    }

    pub fn open_overlays(&self) -> usize {
        lock(&self.open_overlays).len()
    }

    fn record(&self, actuation: Actuation) {
        info!("dry-run actuation: {:?}", actuation);
        lock(&self.log).push(actuation);
    }
}

#[async_trait]
impl GestureDispatcher for DryRunHost {
    async fn dispatch(&self, gesture: &Gesture) -> bool {
        if self.reject_gestures.load(Ordering::SeqCst) {
            return false;
        }
        self.record(Actuation::Gesture(gesture.clone()));
        true
    }
}

impl AudioControl for DryRunHost {
    fn mute(&self) {
        self.record(Actuation::Mute);
    }

    fn unmute(&self) {
        self.record(Actuation::Unmute);
    }
}

impl OverlayManager for DryRunHost {
    fn show(&self, bounds: Rect) -> Result<OverlayId, RuleError> {
        let id = OverlayId(self.next_overlay.fetch_add(1, Ordering::SeqCst));
        lock(&self.open_overlays).insert(id);
        self.record(Actuation::OverlayShown { id, bounds });
        Ok(id)
    }

    fn update(&self, overlay: OverlayId, bounds: Rect) -> Result<(), RuleError> {
        if !lock(&self.open_overlays).contains(&overlay) {
            return Err(RuleError::OverlayError(format!(
                "覆盖层 {:?} 不存在",
                overlay
            )));
        }
        self.record(Actuation::OverlayUpdated {
            id: overlay,
            bounds,
        });
        Ok(())
    }

    fn remove(&self, overlay: OverlayId) {
        if lock(&self.open_overlays).remove(&overlay) {
            self.record(Actuation::OverlayRemoved { id: overlay });
        }
    }
}

impl GlobalNavigator for DryRunHost {
    fn back(&self) -> bool {
        if self.reject_back.load(Ordering::SeqCst) {
            return false;
        }
        self.record(Actuation::Back);
        true
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
