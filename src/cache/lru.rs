//! LRU Recency List Module
//!
//! Arena-backed doubly linked list that keeps entries in access order.
//!
//! Nodes live in a `Vec` of slots and link to each other by index, so
//! promotion and removal are O(1) without unsafe code. Freed slots are
//! recycled through a free list.

/// Null link marker.
const NIL: usize = usize::MAX;

/// Position of a node inside a [`RecencyList`].
///
/// Only valid for the list that issued it, until that node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Tracks access order for LRU eviction strategy.
///
/// - Head = Most recently used
/// - Tail = Least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    head: usize,
    tail: usize,
    /// Head of the chain of vacant slots, linked through `next`
    free: usize,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts `item` as the most recently used node.
    pub fn push_front(&mut self, item: T) -> NodeId {
        let idx = if self.free != NIL {
            let idx = self.free;
            self.free = self.slots[idx].next;
            self.slots[idx] = Slot {
                item: Some(item),
                prev: NIL,
                next: NIL,
            };
            idx
        } else {
            self.slots.push(Slot {
                item: Some(item),
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        };

        self.link_front(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Move To Front ==
    /// Promotes a node to most recently used.
    pub fn move_to_front(&mut self, id: NodeId) {
        if !self.is_live(id) || self.head == id.0 {
            return;
        }
        self.unlink(id.0);
        self.link_front(id.0);
    }

    // == Remove ==
    /// Detaches a node and returns its item.
    ///
    /// Returns None if `id` does not name a live node.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        self.unlink(id.0);

        let slot = &mut self.slots[id.0];
        let item = slot.item.take();
        slot.next = self.free;
        self.free = id.0;
        self.len -= 1;
        item
    }

    // == Back ==
    /// Returns the least recently used node.
    pub fn back(&self) -> Option<NodeId> {
        (self.tail != NIL).then_some(NodeId(self.tail))
    }

    /// Returns the most recently used node.
    pub fn front(&self) -> Option<NodeId> {
        (self.head != NIL).then_some(NodeId(self.head))
    }

    // == Pop Back ==
    /// Removes and returns the least recently used item.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.back()?;
        self.remove(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0).and_then(|slot| slot.item.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(|slot| slot.item.as_mut())
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Drops every node. The slot buffer keeps its allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Link Audit ==
    /// Walks the list head to tail and checks its structure.
    ///
    /// Detects cycles, revisited nodes, broken back links, a tail that is
    /// not the last node walked, and a walk length that disagrees with
    /// the live node count.
    pub fn check_links(&self) -> Result<(), String> {
        let mut seen = vec![false; self.slots.len()];
        let mut prev = NIL;
        let mut cursor = self.head;
        let mut walked = 0usize;

        while cursor != NIL {
            let slot = self
                .slots
                .get(cursor)
                .ok_or_else(|| format!("link to out-of-range slot {}", cursor))?;
            if seen[cursor] {
                return Err(format!("slot {} reached twice", cursor));
            }
            seen[cursor] = true;
            if slot.item.is_none() {
                return Err(format!("vacant slot {} is linked", cursor));
            }
            if slot.prev != prev {
                return Err(format!("slot {} has a broken back link", cursor));
            }
            walked += 1;
            prev = cursor;
            cursor = slot.next;
        }

        if self.tail != prev {
            return Err(format!("tail is {} but walk ended at {}", self.tail, prev));
        }
        if walked != self.len {
            return Err(format!("walked {} nodes but len is {}", walked, self.len));
        }
        let occupied = self.slots.iter().filter(|s| s.item.is_some()).count();
        if occupied != self.len {
            return Err(format!("{} occupied slots but len is {}", occupied, self.len));
        }
        Ok(())
    }

    fn is_live(&self, id: NodeId) -> bool {
        self.slots
            .get(id.0)
            .is_some_and(|slot| slot.item.is_some())
    }

    fn link_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.slots[idx].prev = NIL;
        self.slots[idx].next = NIL;
    }
}

/// Iterator from most to least recently used.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let idx = self.cursor;
        let slot = &self.list.slots[idx];
        self.cursor = slot.next;
        slot.item.as_ref().map(|item| (NodeId(idx), item))
    }
}
