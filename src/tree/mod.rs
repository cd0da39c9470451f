mod memory;
mod path;

pub use memory::{MemoryNode, MemoryTree, NodeSpec};
pub use path::{PathStep, RelativePath};

use crate::types::Rect;

/// 宿主元素树中节点的句柄
///
/// 句柄只在一次事件处理中有效; 唯一的例外是覆盖层动作, 它会在刷新循环中持有句柄,
/// 并通过 [`ElementNode::refresh`] 判断节点是否仍然存在。
pub trait ElementNode: Clone + PartialEq + Send + Sync + 'static {
    /// 完整的元素 id, 形如 `com.app:id/skip`
    fn view_id(&self) -> Option<String>;

    fn text(&self) -> Option<String>;

    fn parent(&self) -> Option<Self>;

    fn child_count(&self) -> usize;

    fn child(&self, index: usize) -> Option<Self>;

    fn bounds_in_screen(&self) -> Rect;

    fn is_clickable(&self) -> bool;

    /// 对节点执行点击, 返回宿主是否接受
    fn perform_click(&self) -> bool;

    /// 重新校验句柄, 节点已消失时返回 false
    fn refresh(&self) -> bool;

    /// 在以 `self` 为根的子树(包含自身)中按文档顺序查找 id 完全相等的节点
    fn find_by_view_id(&self, view_id: &str) -> Vec<Self> {
        let mut found = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if node.view_id().as_deref() == Some(view_id) {
                found.push(node.clone());
            }
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
        found
    }

    /// 在父节点子列表中的下标
    fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        (0..parent.child_count()).find(|&i| parent.child(i).as_ref() == Some(self))
    }
}
