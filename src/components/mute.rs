use std::sync::Arc;
use tracing::debug;

use crate::host::AudioControl;

/// 静音动作, 节点消失时恢复
pub struct MuteAction {
    audio: Arc<dyn AudioControl>,
}

impl MuteAction {
    pub fn new(audio: Arc<dyn AudioControl>) -> Self {
        Self { audio }
    }

    pub fn on_seen(&self) {
        debug!("静音媒体音频");
        self.audio.mute();
    }

    pub fn on_gone(&self) {
        debug!("取消媒体音频静音");
        self.audio.unmute();
    }
}

impl std::fmt::Debug for MuteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MuteAction")
    }
}
