use tracing::{debug, error};

use crate::tree::ElementNode;
use crate::types::RuleError;

/// 点击动作: 从目标节点开始向上查找第一个可点击的节点并点击
#[derive(Debug)]
pub struct ClickAction {
    max_depth: usize,
}

impl ClickAction {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn on_seen<N: ElementNode>(&self, node: &N) -> Result<(), RuleError> {
        debug!("执行点击动作");
        let view_id = node.view_id().unwrap_or_default();
        let clickable = self.find_clickable(node).ok_or_else(|| {
            error!("在 {} 层内找不到 {} 的可点击祖先", self.max_depth, view_id);
            RuleError::NoClickableNode(view_id.clone())
        })?;
        if !clickable.perform_click() {
            return Err(RuleError::ClickRejected(
                clickable.view_id().unwrap_or(view_id),
            ));
        }
        Ok(())
    }

    /// 检查节点自身以及最多 `max_depth` 层祖先
    pub fn find_clickable<N: ElementNode>(&self, node: &N) -> Option<N> {
        let mut current = node.clone();
        for level in 0..=self.max_depth {
            if current.is_clickable() {
                debug!(
                    "在第 {} 层找到可点击节点 {:?}",
                    level,
                    current.view_id()
                );
                return Some(current);
            }
            current = current.parent()?;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{MemoryTree, NodeSpec};

    #[test]
    fn clicks_the_node_itself_when_clickable() {
        let tree = MemoryTree::new();
        let button = tree.add_child(&tree.root(), NodeSpec::new().clickable(true));
        ClickAction::new(3).on_seen(&button).unwrap();
        assert_eq!(tree.click_count(&button), 1);
    }

    #[test]
    fn walks_up_to_depth_limit() {
        let tree = MemoryTree::new();
        let card = tree.add_child(&tree.root(), NodeSpec::new().clickable(true));
        let l1 = tree.add_child(&card, NodeSpec::new());
        let l2 = tree.add_child(&l1, NodeSpec::new());
        let l3 = tree.add_child(&l2, NodeSpec::new());
        let l4 = tree.add_child(&l3, NodeSpec::new());
        let l5 = tree.add_child(&l4, NodeSpec::new());

        // card 是 l4 的第 4 层祖先
        ClickAction::new(4).on_seen(&l4).unwrap();
        assert_eq!(tree.click_count(&card), 1);

        // 对 l5 来说是第 5 层, 超出限制
        let err = ClickAction::new(4).on_seen(&l5).unwrap_err();
        assert!(matches!(err, RuleError::NoClickableNode(_)));
        assert_eq!(tree.click_count(&card), 1);
    }

    #[test]
    fn fails_at_root_without_clickable_ancestor() {
        let tree = MemoryTree::new();
        let label = tree.add_child(&tree.root(), NodeSpec::new().view_id("a:id/label"));
        let err = ClickAction::new(3).on_seen(&label).unwrap_err();
        assert!(matches!(err, RuleError::NoClickableNode(id) if id == "a:id/label"));
    }
}
