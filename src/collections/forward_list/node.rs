cfg_if::cfg_if! {
    if #[cfg(feature = "no-std")] {
        use alloc::vec::Vec;
    } else {
        use std::vec::Vec;
    }
}

use super::cursor::ListId;

/// index of the sentinel slot. it is allocated with the storage and never
/// released, so it is always a valid anchor for insert-after and erase-after
pub(crate) const SENTINEL: usize = 0;

/// a stable reference to a slot, only valid while the slot's generation has
/// not moved on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Handle {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

/// the private layout of a slot, either the sentinel, user-provided data, or
/// a released slot waiting to be reused
pub(crate) enum Node<T> {
    Sentinel { next: Option<usize> },
    Data { data: T, next: Option<usize> },
    Vacant { next_free: Option<usize> },
}

pub(crate) struct Slot<T> {
    /// bumped every time the node in this slot is destroyed. 64 bits wide, so
    /// a handle cannot alias a later node in this slot in practice
    generation: u64,
    node: Node<T>,
}

impl<T> Slot<T> {
    pub(crate) fn next(&self) -> Option<usize> {
        match &self.node {
            Node::Sentinel { next } | Node::Data { next, .. } => *next,
            Node::Vacant { .. } => unreachable!("vacant slots are never linked into the chain"),
        }
    }

    pub(crate) fn data(&self) -> Option<&T> {
        match &self.node {
            Node::Data { data, .. } => Some(data),
            Node::Sentinel { .. } | Node::Vacant { .. } => None,
        }
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut T> {
        match &mut self.node {
            Node::Data { data, .. } => Some(data),
            Node::Sentinel { .. } | Node::Vacant { .. } => None,
        }
    }

    fn set_next(&mut self, new_next: Option<usize>) {
        match &mut self.node {
            Node::Sentinel { ref mut next } | Node::Data { ref mut next, .. } => *next = new_next,
            Node::Vacant { .. } => unreachable!("vacant slots are never linked into the chain"),
        }
    }

    fn is_vacant(&self) -> bool {
        matches!(self.node, Node::Vacant { .. })
    }
}

/// the slot arena backing a forward list. every data slot is linked from
/// exactly one predecessor, so the chain starting at [`SENTINEL`] owns each
/// element exactly once.
pub(crate) struct NodeStorage<T> {
    /// identifies this storage to cursors referencing its element slots. it
    /// travels with the slots when two lists are swapped.
    pub(crate) id: ListId,
    slots: Vec<Slot<T>>,
    /// head of the intrusive list of vacant slots
    free: Option<usize>,
}

impl<T> NodeStorage<T> {
    pub(crate) fn new() -> Self {
        let mut slots = Vec::with_capacity(1);
        slots.push(Slot {
            generation: 0,
            node: Node::Sentinel { next: None },
        });
        Self {
            id: ListId::next(),
            slots,
            free: None,
        }
    }

    pub(crate) fn handle(&self, index: usize) -> Handle {
        Handle {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// returns true if the handle still refers to a node in the chain
    pub(crate) fn is_live(&self, handle: Handle) -> bool {
        match self.slots.get(handle.index) {
            Some(slot) => slot.generation == handle.generation && !slot.is_vacant(),
            None => false,
        }
    }

    pub(crate) fn next(&self, index: usize) -> Option<usize> {
        self.slots[index].next()
    }

    pub(crate) fn set_next(&mut self, index: usize, next: Option<usize>) {
        self.slots[index].set_next(next);
    }

    pub(crate) fn data(&self, index: usize) -> Option<&T> {
        self.slots[index].data()
    }

    pub(crate) fn data_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots[index].data_mut()
    }

    /// walk the chain from the sentinel to the last linked slot
    pub(crate) fn tail(&self) -> usize {
        let mut curr = SENTINEL;
        while let Some(next) = self.next(curr) {
            curr = next;
        }
        curr
    }

    /// place `data` in a slot whose successor is `next`, reusing a vacant slot
    /// if one exists. the new slot is not linked from anywhere yet.
    pub(crate) fn allocate(&mut self, data: T, next: Option<usize>) -> usize {
        match self.free {
            Some(index) => {
                let slot = &mut self.slots[index];
                self.free = match slot.node {
                    Node::Vacant { next_free } => next_free,
                    _ => unreachable!("free list only ever holds vacant slots"),
                };
                slot.node = Node::Data { data, next };
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Node::Data { data, next },
                });
                self.slots.len() - 1
            }
        }
    }

    /// destroy the node in `index`, returning its data and successor. the
    /// caller must already have unlinked it from its predecessor.
    pub(crate) fn release(&mut self, index: usize) -> (T, Option<usize>) {
        assert_ne!(index, SENTINEL, "the sentinel slot is never released");

        let slot = &mut self.slots[index];
        let vacant = Node::Vacant {
            next_free: self.free,
        };
        match core::mem::replace(&mut slot.node, vacant) {
            Node::Data { data, next } => {
                slot.generation += 1;
                self.free = Some(index);
                (data, next)
            }
            _ => unreachable!("only data slots are linked after the sentinel"),
        }
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut Slot<T> {
        self.slots.as_mut_ptr()
    }
}
