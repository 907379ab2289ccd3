//! Arena-backed doubly linked list.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`] index rather than
//! by pointer, so unlinking and relinking are plain index rewrites and a stale
//! handle can at worst hit a freed slot, never freed memory. Slots `0` and `1`
//! are the permanent head and tail sentinels; every real node sits between
//! them. Freed slots go on a free list and are reused by the next allocation.
//!
//! A node is either fully unlinked (`prev == next == None`) or linked on both
//! sides into this list.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

/// Handle to a node slot inside one [`List`].
///
/// Handles are only meaningful for the list that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

const HEAD: NodeId = NodeId(0);
const TAIL: NodeId = NodeId(1);

/// A slot in the arena: a value plus links to its neighbours.
///
/// Sentinels and freed slots carry no value.
struct Node<T> {
    val: Option<T>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: Some(val),
            prev: None,
            next: None,
        }
    }

    fn new_sigil() -> Self {
        Node {
            val: None,
            prev: None,
            next: None,
        }
    }

    fn is_linked(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }
}

/// A doubly linked list over an index arena, with head and tail sentinels.
///
/// Items are ordered front (just after the head sentinel) to back (just before
/// the tail sentinel). The list itself imposes no capacity; the caches that
/// own lists enforce their own bounds.
pub(crate) struct List<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list holding only its two sentinels.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `cap` nodes before reallocating.
    pub(crate) fn with_capacity(cap: usize) -> Self {
        let mut nodes = Vec::with_capacity(cap.saturating_add(2));
        nodes.push(Node::new_sigil());
        nodes.push(Node::new_sigil());
        nodes[HEAD.0].next = Some(TAIL);
        nodes[TAIL.0].prev = Some(HEAD);
        List {
            nodes,
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of nodes currently linked between the sentinels.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The head sentinel. Inserting after it puts a node at the front.
    #[inline]
    pub(crate) fn head(&self) -> NodeId {
        HEAD
    }

    /// Allocates an unlinked node holding `val`.
    pub(crate) fn alloc(&mut self, val: T) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Node::new(val);
                NodeId(idx)
            }
            None => {
                self.nodes.push(Node::new(val));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Links the unlinked node `node` immediately after `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not linked into this list (a freed slot, an
    /// unlinked node, or the tail sentinel), or if `node` is a sentinel, a
    /// freed slot, or already linked.
    pub(crate) fn insert_after(&mut self, node: NodeId, target: NodeId) {
        assert!(
            self.is_live(node) && !self.nodes[node.0].is_linked(),
            "insert_after: node {node:?} must be a live, unlinked node"
        );
        let next = match self.nodes[target.0].next {
            Some(next) if target == HEAD || self.is_live(target) => next,
            _ => panic!("insert_after: target {target:?} is not linked into this list"),
        };

        self.nodes[node.0].prev = Some(target);
        self.nodes[node.0].next = Some(next);
        self.nodes[target.0].next = Some(node);
        self.nodes[next.0].prev = Some(node);
        self.len += 1;
    }

    /// Splices `node` out of the list and clears its links.
    ///
    /// Unlinking a node that is not linked is a no-op. Returns `node` so the
    /// caller can relink or release it.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a sentinel or a freed slot.
    pub(crate) fn unlink(&mut self, node: NodeId) -> NodeId {
        assert!(self.is_live(node), "unlink: {node:?} is not a live node");
        let (prev, next) = {
            let n = &self.nodes[node.0];
            (n.prev, n.next)
        };
        if let (Some(prev), Some(next)) = (prev, next) {
            self.nodes[prev.0].next = Some(next);
            self.nodes[next.0].prev = Some(prev);
            self.len -= 1;
        }
        let n = &mut self.nodes[node.0];
        n.prev = None;
        n.next = None;
        node
    }

    /// Frees the slot of an unlinked node and hands back its value.
    ///
    /// # Panics
    ///
    /// Panics if `node` is still linked, a sentinel, or already freed.
    pub(crate) fn release(&mut self, node: NodeId) -> T {
        assert!(
            !self.nodes[node.0].is_linked(),
            "release: {node:?} is still linked"
        );
        let val = match self.nodes[node.0].val.take() {
            Some(val) if node != HEAD && node != TAIL => val,
            _ => panic!("release: {node:?} is not a live node"),
        };
        self.free.push(node.0);
        val
    }

    /// Unlinks `node` and frees its slot, returning the value.
    pub(crate) fn remove(&mut self, node: NodeId) -> T {
        let node = self.unlink(node);
        self.release(node)
    }

    /// Allocates a node for `val` and links it at the front.
    pub(crate) fn push_front(&mut self, val: T) -> NodeId {
        let node = self.alloc(val);
        self.insert_after(node, HEAD);
        node
    }

    /// Moves a linked node to the front of the list.
    pub(crate) fn move_to_front(&mut self, node: NodeId) {
        if self.nodes[HEAD.0].next == Some(node) {
            return;
        }
        let node = self.unlink(node);
        self.insert_after(node, HEAD);
    }

    /// The front node, if any.
    #[inline]
    pub(crate) fn first(&self) -> Option<NodeId> {
        self.next(HEAD)
    }

    /// The back node, if any.
    #[inline]
    pub(crate) fn last(&self) -> Option<NodeId> {
        self.prev(TAIL)
    }

    /// The real node following `node`, or `None` if `node` is last or unlinked.
    pub(crate) fn next(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].next.filter(|&next| next != TAIL)
    }

    /// The real node preceding `node`, or `None` if `node` is first or unlinked.
    pub(crate) fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].prev.filter(|&prev| prev != HEAD)
    }

    /// Returns `true` if `node` holds a value and is linked into the list.
    pub(crate) fn is_linked(&self, node: NodeId) -> bool {
        self.is_live(node) && self.nodes[node.0].is_linked()
    }

    #[inline]
    pub(crate) fn get(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node.0).and_then(|n| n.val.as_ref())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node.0).and_then(|n| n.val.as_mut())
    }

    /// Drops every node, keeping only the sentinels.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD.0].next = Some(TAIL);
        self.nodes[TAIL.0].prev = Some(HEAD);
        self.free.clear();
        self.len = 0;
    }

    /// Iterates front to back.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.first(),
            back: self.last(),
            remaining: self.len,
        }
    }

    fn is_live(&self, node: NodeId) -> bool {
        node != HEAD
            && node != TAIL
            && self.nodes.get(node.0).is_some_and(|n| n.val.is_some())
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("length", &self.len)
            .field("slots", &self.nodes.len())
            .finish()
    }
}

/// Front-to-back iterator over `(NodeId, &T)`, double ended.
pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = self.list.next(id);
        self.remaining -= 1;
        self.list.get(id).map(|val| (id, val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = self.list.prev(id);
        self.remaining -= 1;
        self.list.get(id).map(|val| (id, val))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
