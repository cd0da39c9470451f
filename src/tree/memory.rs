use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::ElementNode;
use crate::types::Rect;

/// 新节点的属性
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    view_id: Option<String>,
    text: Option<String>,
    bounds: Rect,
    clickable: bool,
}

impl NodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }
}

#[derive(Debug)]
struct Slot {
    spec: NodeSpec,
    parent: Option<usize>,
    children: Vec<usize>,
    attached: bool,
    clicks: usize,
}

#[derive(Debug, Default)]
struct Arena {
    slots: Vec<Slot>,
}

impl Arena {
    fn push(&mut self, spec: NodeSpec, parent: Option<usize>) -> usize {
        let index = self.slots.len();
        self.slots.push(Slot {
            spec,
            parent,
            children: Vec::new(),
            attached: true,
            clicks: 0,
        });
        index
    }
}

/// 可变的内存元素树, 用于模拟宿主
///
/// 节点句柄共享同一份存储, 因此对树的修改(改文本、改边界、移除节点)
/// 会立即反映到已经发出的句柄上, 与真实宿主的 refresh 语义一致。
#[derive(Debug, Clone)]
pub struct MemoryTree {
    arena: Arc<RwLock<Arena>>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        let mut arena = Arena::default();
        arena.push(NodeSpec::new(), None);
        Self {
            arena: Arc::new(RwLock::new(arena)),
        }
    }

    pub fn root(&self) -> MemoryNode {
        self.node(0)
    }

    pub fn add_child(&self, parent: &MemoryNode, spec: NodeSpec) -> MemoryNode {
        let mut arena = write(&self.arena);
        let index = arena.push(spec, Some(parent.index));
        arena.slots[parent.index].children.push(index);
        drop(arena);
        self.node(index)
    }

    /// 把节点及其子树从树上摘除, 之后这些句柄的 refresh 返回 false
    pub fn detach(&self, node: &MemoryNode) {
        let mut arena = write(&self.arena);
        if let Some(parent) = arena.slots[node.index].parent {
            arena.slots[parent].children.retain(|&c| c != node.index);
        }
        let mut pending = vec![node.index];
        while let Some(index) = pending.pop() {
            let slot = &mut arena.slots[index];
            slot.attached = false;
            pending.extend(slot.children.iter().copied());
        }
    }

    pub fn set_text(&self, node: &MemoryNode, text: Option<&str>) {
        write(&self.arena).slots[node.index].spec.text = text.map(str::to_string);
    }

    pub fn set_bounds(&self, node: &MemoryNode, bounds: Rect) {
        write(&self.arena).slots[node.index].spec.bounds = bounds;
    }

    pub fn set_clickable(&self, node: &MemoryNode, clickable: bool) {
        write(&self.arena).slots[node.index].spec.clickable = clickable;
    }

    pub fn click_count(&self, node: &MemoryNode) -> usize {
        read(&self.arena).slots[node.index].clicks
    }

    fn node(&self, index: usize) -> MemoryNode {
        MemoryNode {
            arena: self.arena.clone(),
            index,
        }
    }
}

#[derive(Clone)]
pub struct MemoryNode {
    arena: Arc<RwLock<Arena>>,
    index: usize,
}

impl MemoryNode {
    fn sibling(&self, index: usize) -> MemoryNode {
        MemoryNode {
            arena: self.arena.clone(),
            index,
        }
    }
}

impl PartialEq for MemoryNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena) && self.index == other.index
    }
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryNode")
            .field("index", &self.index)
            .field("view_id", &self.view_id())
            .finish()
    }
}

impl ElementNode for MemoryNode {
    fn view_id(&self) -> Option<String> {
        read(&self.arena).slots[self.index].spec.view_id.clone()
    }

    fn text(&self) -> Option<String> {
        read(&self.arena).slots[self.index].spec.text.clone()
    }

    fn parent(&self) -> Option<Self> {
        let parent = read(&self.arena).slots[self.index].parent?;
        Some(self.sibling(parent))
    }

    fn child_count(&self) -> usize {
        read(&self.arena).slots[self.index].children.len()
    }

    fn child(&self, index: usize) -> Option<Self> {
        let child = *read(&self.arena).slots[self.index].children.get(index)?;
        Some(self.sibling(child))
    }

    fn bounds_in_screen(&self) -> Rect {
        read(&self.arena).slots[self.index].spec.bounds
    }

    fn is_clickable(&self) -> bool {
        read(&self.arena).slots[self.index].spec.clickable
    }

    fn perform_click(&self) -> bool {
        let mut arena = write(&self.arena);
        let slot = &mut arena.slots[self.index];
        if !slot.attached {
            return false;
        }
        slot.clicks += 1;
        true
    }

    fn refresh(&self) -> bool {
        read(&self.arena).slots[self.index].attached
    }
}

fn read(arena: &RwLock<Arena>) -> RwLockReadGuard<'_, Arena> {
    arena.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(arena: &RwLock<Arena>) -> RwLockWriteGuard<'_, Arena> {
    arena.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
