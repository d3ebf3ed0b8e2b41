use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::node::{NodeStorage, Slot};
use super::ForwardList;

/// borrowing iterator over the elements of a [`ForwardList`], front to back
pub struct Iter<'a, T> {
    nodes: &'a NodeStorage<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a NodeStorage<T>, first: Option<usize>, len: usize) -> Self {
        Self {
            nodes,
            next: first,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.next?;
        self.next = self.nodes.next(curr);
        self.remaining -= 1;
        self.nodes.data(curr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

/// mutably borrowing iterator over the elements of a [`ForwardList`]
pub struct IterMut<'a, T> {
    slots: *mut Slot<T>,
    next: Option<usize>,
    remaining: usize,
    _list: PhantomData<&'a mut NodeStorage<T>>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(nodes: &'a mut NodeStorage<T>, first: Option<usize>, len: usize) -> Self {
        Self {
            slots: nodes.as_mut_ptr(),
            next: first,
            remaining: len,
            _list: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.next?;

        // SAFETY: `curr` was read from a link in the chain, so it indexes a
        // live slot of the storage we hold an exclusive borrow of. the chain
        // is acyclic, so no slot is visited twice and the returned references
        // never alias.
        let slot = unsafe { &mut *self.slots.add(curr) };
        self.next = slot.next();
        self.remaining -= 1;
        slot.data_mut()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

// SAFETY: IterMut behaves like a `&mut` to the storage
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// owning iterator, popping elements off the front of the list
pub struct IntoIter<T> {
    list: ForwardList<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(list: ForwardList<T>) -> Self {
        Self { list }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for ForwardList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a ForwardList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ForwardList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
