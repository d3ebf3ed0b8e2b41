//! A singly-linked list with a before-begin sentinel.
//!
//! Elements live in a slot arena owned by the list. Slot 0 is the sentinel:
//! it holds no element, and its link is the first element. Because the
//! sentinel is a real node, inserting or erasing at the front goes through the
//! same `insert_after`/`erase_after` path as any interior position.

mod cursor;
mod error;
mod iter;
mod node;

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Index, IndexMut};

use log::{debug, trace};

pub use cursor::{Access, BasicCursor, Cursor, CursorMut, Mutable, ReadOnly};
pub use error::{ForwardListError, ForwardListResult};
pub use iter::{IntoIter, Iter, IterMut};

use cursor::{ListId, Position};
use error::expect_valid;
use node::{NodeStorage, SENTINEL};

/// a singly-linked list supporting O(1) insertion and removal after any known
/// position, including the before-begin position
pub struct ForwardList<T> {
    nodes: NodeStorage<T>,
    /// the number of non-sentinel nodes in the list
    len: usize,
    /// identifies the before-begin and end positions. it stays with this list
    /// across swap and clear, while element positions follow `nodes`.
    anchor: ListId,
}

impl<T> ForwardList<T> {
    /// create a new, empty ForwardList
    pub fn new() -> Self {
        Self {
            nodes: NodeStorage::new(),
            len: 0,
            anchor: ListId::next(),
        }
    }

    /// get the length of the list, not including the sentinel node
    pub fn len(&self) -> usize {
        self.len
    }

    /// returns true if the length of the list is 0
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// get the first element of the list, or None if the list is empty
    pub fn front(&self) -> Option<&T> {
        self.nodes.next(SENTINEL).and_then(|first| self.nodes.data(first))
    }

    /// mutably borrow the first element of the list
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let first = self.nodes.next(SENTINEL)?;
        self.nodes.data_mut(first)
    }

    /// push a value to the front of this list
    pub fn push_front(&mut self, value: T) {
        self.link_after(SENTINEL, value);
    }

    /// push a value to the back of this list. there is no tail link, so this
    /// walks the whole chain.
    pub fn push_back(&mut self, value: T) {
        let tail = self.nodes.tail();
        self.link_after(tail, value);
    }

    /// pop the first element of this list. if the list is empty, None is
    /// returned.
    pub fn pop_front(&mut self) -> Option<T> {
        self.nodes.next(SENTINEL)?;
        Some(self.unlink_after(SENTINEL))
    }

    /// Insert `value` right after `position`, returning a cursor to the new
    /// element. `position` may be the before-begin position, which makes this
    /// a front insertion.
    ///
    /// # Panics
    /// if `position` is the end position, or does not reference a live node
    /// of this list
    #[track_caller]
    pub fn insert_after<A: Access>(
        &mut self,
        position: BasicCursor<T, A>,
        value: T,
    ) -> CursorMut<T> {
        expect_valid(self.try_insert_after(position, value))
    }

    /// checked form of [`ForwardList::insert_after`]. on error, `value` is
    /// dropped and the list is left unchanged.
    pub fn try_insert_after<A: Access>(
        &mut self,
        position: BasicCursor<T, A>,
        value: T,
    ) -> ForwardListResult<CursorMut<T>> {
        let prev = self.locate_node(&position)?;
        let inserted = self.link_after(prev, value);
        Ok(self.cursor_at(Some(inserted)))
    }

    /// Destroy the element right after `position`, returning a cursor to the
    /// node that now follows `position` (which is the end position if the
    /// last element was erased).
    ///
    /// # Panics
    /// if `position` is the end position, the last element, or does not
    /// reference a live node of this list
    #[track_caller]
    pub fn erase_after<A: Access>(&mut self, position: BasicCursor<T, A>) -> CursorMut<T> {
        expect_valid(self.try_erase_after(position))
    }

    /// checked form of [`ForwardList::erase_after`]
    pub fn try_erase_after<A: Access>(
        &mut self,
        position: BasicCursor<T, A>,
    ) -> ForwardListResult<CursorMut<T>> {
        let prev = self.locate_node(&position)?;
        if self.nodes.next(prev).is_none() {
            return Err(ForwardListError::NoSuccessor);
        }

        drop(self.unlink_after(prev));
        Ok(self.cursor_at(self.nodes.next(prev)))
    }

    /// Drop every element, front to back. The before-begin and end positions
    /// survive the clear, cursors to the erased elements become stale. The
    /// released slots are kept for reuse, like the capacity of a cleared `Vec`.
    pub fn clear(&mut self) {
        let released = self.len;
        while self.pop_front().is_some() {}

        if released > 0 {
            trace!("cleared forward list, released {} nodes", released);
        }
    }

    /// Exchange the contents of two lists without touching their elements.
    /// Element cursors keep referencing the same nodes, which now belong to
    /// `other`. Each list keeps its own before-begin and end positions.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.nodes, &mut other.nodes);
        core::mem::swap(&mut self.len, &mut other.len);
    }

    /// returns true if the list contains an element equal to `value`
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|data| data == value)
    }

    /// return an immutable iterator for this list
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.nodes.next(SENTINEL), self.len)
    }

    /// return a mutable iterator for this list
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let first = self.nodes.next(SENTINEL);
        IterMut::new(&mut self.nodes, first, self.len)
    }

    /// the position before the first element, only valid as an argument to
    /// insert-after, erase-after and advance
    pub fn before_begin(&self) -> CursorMut<T> {
        self.cursor_at(Some(SENTINEL))
    }

    /// the position of the first element, equal to [`ForwardList::end`] if
    /// the list is empty
    pub fn begin(&self) -> CursorMut<T> {
        self.cursor_at(self.nodes.next(SENTINEL))
    }

    /// the position past the last element
    pub fn end(&self) -> CursorMut<T> {
        self.cursor_at(None)
    }

    pub fn cbefore_begin(&self) -> Cursor<T> {
        self.before_begin().as_read_only()
    }

    pub fn cbegin(&self) -> Cursor<T> {
        self.begin().as_read_only()
    }

    pub fn cend(&self) -> Cursor<T> {
        self.end().as_read_only()
    }

    /// move `cursor` forward one node
    ///
    /// # Panics
    /// if `cursor` is the end position or is not a live position of this list
    #[track_caller]
    pub fn advance<A: Access>(&self, cursor: &mut BasicCursor<T, A>) {
        *cursor = self.successor(*cursor);
    }

    /// the position one node after `cursor`, leaving `cursor` itself in place
    ///
    /// # Panics
    /// same as [`ForwardList::advance`]
    #[track_caller]
    pub fn successor<A: Access>(&self, cursor: BasicCursor<T, A>) -> BasicCursor<T, A> {
        expect_valid(self.try_successor(cursor))
    }

    /// checked form of [`ForwardList::successor`]
    pub fn try_successor<A: Access>(
        &self,
        cursor: BasicCursor<T, A>,
    ) -> ForwardListResult<BasicCursor<T, A>> {
        let curr = self.locate_node(&cursor)?;
        Ok(self.cursor_at(self.nodes.next(curr)))
    }

    /// get the element at `cursor`, or None if the cursor is not an element
    /// position of this list
    pub fn get<A: Access>(&self, cursor: BasicCursor<T, A>) -> Option<&T> {
        self.try_get(cursor).ok()
    }

    /// mutably borrow the element at `cursor`
    pub fn get_mut(&mut self, cursor: CursorMut<T>) -> Option<&mut T> {
        self.try_get_mut(cursor).ok()
    }

    pub fn try_get<A: Access>(&self, cursor: BasicCursor<T, A>) -> ForwardListResult<&T> {
        let curr = self.locate_node(&cursor)?;
        self.nodes
            .data(curr)
            .ok_or(ForwardListError::BeforeBegin)
    }

    pub fn try_get_mut(&mut self, cursor: CursorMut<T>) -> ForwardListResult<&mut T> {
        let curr = self.locate_node(&cursor)?;
        self.nodes
            .data_mut(curr)
            .ok_or(ForwardListError::BeforeBegin)
    }

    /// Build a list from fallibly produced values. The first error abandons
    /// the partially built list, dropping everything collected so far.
    pub fn try_from_iter<E, I>(iter: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let mut list = Self::new();
        let mut tail = SENTINEL;
        for value in iter {
            tail = list.link_after(tail, value?);
        }
        Ok(list)
    }

    /// copy this list with a fallible element copy
    pub fn try_clone_with<E, F>(&self, copy: F) -> Result<Self, E>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        Self::try_from_iter(self.iter().map(copy))
    }

    /// Replace the contents of this list with copies of `source`'s elements.
    /// The copy is built in full before it is swapped in, so if `copy` fails
    /// this list is left exactly as it was.
    pub fn try_assign_from_with<E, F>(&mut self, source: &Self, copy: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        match source.try_clone_with(copy) {
            Ok(mut replacement) => {
                self.swap(&mut replacement);
                trace!("assigned forward list, new length {}", self.len);
                Ok(())
            }
            Err(e) => {
                debug!(
                    "copy into forward list failed, keeping its {} elements",
                    self.len
                );
                Err(e)
            }
        }
    }

    /// Replace the contents of this list with clones of `source`'s elements,
    /// copy-and-swap style. If a clone panics the temporary is dropped while
    /// unwinding and this list is untouched.
    pub fn assign_from(&mut self, source: &Self)
    where
        T: Clone,
    {
        let mut replacement = source.clone();
        self.swap(&mut replacement);
        trace!("assigned forward list, new length {}", self.len);
    }

    /// build a list holding clones of `values`, in order
    pub fn from_slice(values: &[T]) -> Self
    where
        T: Clone,
    {
        values.iter().cloned().collect()
    }

    /// splice `value` in right after the node in `prev`
    fn link_after(&mut self, prev: usize, value: T) -> usize {
        let next = self.nodes.next(prev);
        let inserted = self.nodes.allocate(value, next);
        self.nodes.set_next(prev, Some(inserted));
        self.len += 1;
        inserted
    }

    /// remove the node after `prev`, which must exist
    fn unlink_after(&mut self, prev: usize) -> T {
        let Some(victim) = self.nodes.next(prev) else {
            unreachable!("callers check that a successor exists");
        };
        let (data, next) = self.nodes.release(victim);
        self.nodes.set_next(prev, next);
        self.len -= 1;
        data
    }

    /// resolve a cursor to the slot it references
    fn locate_node<A: Access>(&self, cursor: &BasicCursor<T, A>) -> ForwardListResult<usize> {
        match cursor.position {
            Position::End if cursor.list == self.anchor => Err(ForwardListError::PastTheEnd),
            Position::Node(handle) if handle.index == SENTINEL && cursor.list == self.anchor => {
                Ok(SENTINEL)
            }
            Position::Node(handle) if handle.index != SENTINEL && cursor.list == self.nodes.id => {
                if self.nodes.is_live(handle) {
                    Ok(handle.index)
                } else {
                    Err(ForwardListError::StalePosition)
                }
            }
            _ => Err(ForwardListError::ForeignPosition),
        }
    }

    /// the before-begin and end positions are stamped with the list's anchor,
    /// element positions with the identity of the storage holding them
    fn cursor_at<A: Access>(&self, index: Option<usize>) -> BasicCursor<T, A> {
        match index {
            Some(index) => {
                let list = if index == SENTINEL {
                    self.anchor
                } else {
                    self.nodes.id
                };
                BasicCursor::new(list, Position::Node(self.nodes.handle(index)))
            }
            None => BasicCursor::new(self.anchor, Position::End),
        }
    }
}

/// exchange the contents of two lists
pub fn swap<T>(lhs: &mut ForwardList<T>, rhs: &mut ForwardList<T>) {
    lhs.swap(rhs);
}

impl<T> Default for ForwardList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ForwardList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_from(source);
    }
}

impl<T> FromIterator<T> for ForwardList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for ForwardList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> Extend<T> for ForwardList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut tail = self.nodes.tail();
        for value in iter {
            tail = self.link_after(tail, value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for ForwardList<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, A: Access> Index<BasicCursor<T, A>> for ForwardList<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, cursor: BasicCursor<T, A>) -> &T {
        expect_valid(self.try_get(cursor))
    }
}

impl<T> IndexMut<CursorMut<T>> for ForwardList<T> {
    #[track_caller]
    fn index_mut(&mut self, cursor: CursorMut<T>) -> &mut T {
        expect_valid(self.try_get_mut(cursor))
    }
}

impl<T: PartialEq> PartialEq for ForwardList<T> {
    fn eq(&self, other: &Self) -> bool {
        if core::ptr::eq(self, other) {
            return true;
        }
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ForwardList<T> {}

impl<T: PartialOrd> PartialOrd for ForwardList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for ForwardList<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for ForwardList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for data in self {
            data.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ForwardList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}


#[cfg(all(test, not(feature = "loom")))]
mod cursor_tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: &'static str,
        age: u32,
    }

    #[test]
    fn before_begin_advanced_once_is_begin() {
        let ll = ForwardList::from([1, 2, 3]);
        let mut cursor = ll.before_begin();
        ll.advance(&mut cursor);
        assert_eq!(cursor, ll.begin());
        assert_eq!(ll.successor(ll.cbefore_begin()), ll.cbegin());
    }

    #[test]
    fn before_begin_of_empty_list_advances_to_end() {
        let ll = ForwardList::<u32>::new();
        assert_eq!(ll.successor(ll.before_begin()), ll.end());
        assert_eq!(ll.cbegin(), ll.cend());
    }

    #[test]
    fn mutable_and_read_only_cursors_compare_equal() {
        let ll = ForwardList::from([1]);
        assert_eq!(ll.begin(), ll.cbegin());
        assert_eq!(ll.cbegin(), ll.begin());
        let read_only: Cursor<_> = ll.before_begin().into();
        assert_eq!(read_only, ll.cbefore_begin());
        assert_ne!(ll.cbegin(), ll.cend());
    }

    #[test]
    fn successor_leaves_original_in_place() {
        let ll = ForwardList::from([1, 2]);
        let first = ll.begin();
        let second = ll.successor(first);
        assert_eq!(ll[first], 1);
        assert_eq!(ll[second], 2);
        assert!(ll.successor(second).is_end());
    }

    #[test]
    fn walking_cursors_visits_every_element() {
        let nums = [73, 42, 114, 901];
        let ll = ForwardList::from(nums);

        let mut seen = Vec::new();
        let mut cursor = ll.cbegin();
        while cursor != ll.cend() {
            seen.push(ll[cursor]);
            ll.advance(&mut cursor);
        }
        assert_eq!(seen, nums);
    }

    #[test]
    fn insert_after_before_begin_is_front_insertion() {
        let mut ll = ForwardList::from([1, 2, 3]);
        let inserted = ll.insert_after(ll.before_begin(), 9);
        assert_eq!(inserted, ll.begin());
        assert_eq!(ll[inserted], 9);
        assert_eq!(ll.len(), 4);
        assert_eq!(ll, ForwardList::from([9, 1, 2, 3]));
    }

    #[test]
    fn insert_after_into_empty_list() {
        let mut ll = ForwardList::new();
        let inserted = ll.insert_after(ll.cbefore_begin(), 42);
        assert_eq!(inserted, ll.begin());
        assert!(ll.successor(inserted).is_end());
        assert_eq!(ll.len(), 1);
    }

    #[test]
    fn insert_after_interior_position() {
        let mut ll = ForwardList::from([1, 3]);
        let first = ll.begin();
        let inserted = ll.insert_after(first, 2);
        assert_eq!(ll.successor(first), inserted);
        assert_eq!(ll, ForwardList::from([1, 2, 3]));

        let last = ll.successor(inserted);
        let tail = ll.insert_after(last, 4);
        assert!(ll.successor(tail).is_end());
        assert_eq!(ll, ForwardList::from([1, 2, 3, 4]));
    }

    #[test]
    fn erase_after_before_begin_removes_front() {
        let mut ll = ForwardList::from([1, 2, 3, 4]);
        let next = ll.erase_after(ll.before_begin());
        assert_eq!(next, ll.begin());
        assert_eq!(ll, ForwardList::from([2, 3, 4]));
        assert_eq!(ll.len(), 3);
    }

    #[test]
    fn erasing_last_element_returns_end() {
        let mut ll = ForwardList::from([1, 2, 3, 4]);
        let mut second_to_last = ll.begin();
        ll.advance(&mut second_to_last);
        ll.advance(&mut second_to_last);

        let next = ll.erase_after(second_to_last);
        assert_eq!(next, ll.end());
        assert_eq!(ll, ForwardList::from([1, 2, 3]));
    }

    #[test]
    fn erase_only_invalidates_the_erased_position() {
        let mut ll = ForwardList::from([1, 2, 3]);
        let first = ll.begin();
        let second = ll.successor(first);
        let third = ll.successor(second);

        ll.erase_after(first);
        assert_eq!(ll.try_get(second), Err(ForwardListError::StalePosition));
        assert_eq!(ll[first], 1);
        assert_eq!(ll[third], 3);
        assert_eq!(ll.successor(first), third);
    }

    #[test]
    fn stale_cursor_stays_stale_after_slot_reuse() {
        let mut ll = ForwardList::from([1, 2]);
        let first = ll.begin();
        ll.pop_front();
        ll.push_front(5);

        assert_eq!(ll.get(first), None);
        assert_eq!(
            ll.try_insert_after(first, 6),
            Err(ForwardListError::StalePosition)
        );
        assert_eq!(ll, ForwardList::from([5, 2]));
    }

    #[test]
    fn cursors_from_other_lists_are_rejected() {
        let mut a = ForwardList::from([1]);
        let b = ForwardList::from([1]);
        assert_ne!(a.begin(), b.begin());
        assert_eq!(
            a.try_erase_after(b.before_begin()),
            Err(ForwardListError::ForeignPosition)
        );
        assert_eq!(a.try_get(b.begin()), Err(ForwardListError::ForeignPosition));
    }

    #[test]
    fn before_begin_and_end_survive_clear() {
        let mut ll = ForwardList::from([1, 2]);
        let before = ll.before_begin();
        let old_end = ll.cend();

        ll.clear();
        assert_eq!(before, ll.before_begin());
        assert_eq!(old_end, ll.cend());

        let inserted = ll.insert_after(before, 7);
        assert_eq!(ll, ForwardList::from([7]));
        assert_eq!(ll.successor(inserted), old_end);
    }

    #[test]
    fn element_cursors_are_stale_after_clear() {
        let mut ll = ForwardList::from([1, 2]);
        let first = ll.begin();
        let second = ll.successor(first);

        ll.clear();
        ll.push_front(3);
        assert_eq!(ll.try_get(first), Err(ForwardListError::StalePosition));
        assert_eq!(
            ll.try_insert_after(second, 4),
            Err(ForwardListError::StalePosition)
        );
        assert_eq!(ll, ForwardList::from([3]));
    }

    #[test]
    fn before_begin_and_end_stay_with_their_list_across_swap() {
        let mut a = ForwardList::from([1]);
        let mut b = ForwardList::from([2]);
        let a_before = a.before_begin();
        let a_end = a.end();

        a.swap(&mut b);
        assert_eq!(a_before, a.before_begin());
        assert_eq!(a_end, a.end());
        assert_eq!(a.try_insert_after(a_before, 9), Ok(a.begin()));
        assert_eq!(a, ForwardList::from([9, 2]));
        assert_eq!(b, ForwardList::from([1]));

        assert_eq!(
            b.try_insert_after(a_before, 0),
            Err(ForwardListError::ForeignPosition)
        );
        assert_eq!(b.try_successor(a_end), Err(ForwardListError::ForeignPosition));
        assert_eq!(b, ForwardList::from([1]));
    }

    #[test]
    fn element_cursors_follow_their_nodes_across_swap() {
        let mut a = ForwardList::from([1, 2]);
        let mut b = ForwardList::<i32>::new();
        let first = a.begin();
        let second = a.successor(first);

        swap(&mut a, &mut b);
        assert_eq!(b.successor(first), second);
        b.insert_after(second, 3);
        assert_eq!(b, ForwardList::from([1, 2, 3]));
        assert_eq!(a.try_get(first), Err(ForwardListError::ForeignPosition));
        assert!(a.is_empty());
    }

    #[test]
    fn before_begin_survives_assignment() {
        let mut ll = ForwardList::from([1, 2]);
        let before = ll.before_begin();
        let first = ll.begin();

        ll.assign_from(&ForwardList::from([5, 6]));
        ll.insert_after(before, 4);
        assert_eq!(ll, ForwardList::from([4, 5, 6]));
        assert_eq!(ll.get(first), None);
    }

    #[test]
    fn checked_operations_report_violations() {
        let mut ll = ForwardList::from([1]);
        assert_eq!(ll.try_get(ll.before_begin()), Err(ForwardListError::BeforeBegin));
        assert_eq!(ll.try_get(ll.end()), Err(ForwardListError::PastTheEnd));
        assert_eq!(
            ll.try_successor(ll.cend()),
            Err(ForwardListError::PastTheEnd)
        );
        assert_eq!(
            ll.try_insert_after(ll.end(), 2),
            Err(ForwardListError::PastTheEnd)
        );
        assert_eq!(
            ll.try_erase_after(ll.begin()),
            Err(ForwardListError::NoSuccessor)
        );
        assert_eq!(ll.len(), 1);
    }

    #[test]
    fn cursor_can_mutate_elements() {
        let mut ll = ForwardList::from([42, 73]);
        let first = ll.begin();
        ll[first] += 1;
        *ll.get_mut(ll.successor(first)).expect("second element exists") += 1;
        assert_eq!(ll, ForwardList::from([43, 74]));
    }

    #[test]
    fn cursor_gives_member_access() {
        let mut ll = ForwardList::from([Person {
            name: "mary",
            age: 30,
        }]);
        let first = ll.begin();
        assert_eq!(ll[first].name, "mary");
        ll[first].age += 1;
        assert_eq!(ll[first.as_read_only()].age, 31);
    }

    #[test]
    fn get_returns_none_for_non_element_positions() {
        let mut ll = ForwardList::from([1]);
        assert_eq!(ll.get(ll.before_begin()), None);
        assert_eq!(ll.get(ll.cend()), None);
        assert_eq!(ll.get_mut(ll.end()), None);
    }

    #[test]
    #[should_panic(expected = "past the end")]
    fn advancing_end_panics() {
        let ll = ForwardList::from([1]);
        let mut end = ll.end();
        ll.advance(&mut end);
    }

    #[test]
    #[should_panic(expected = "before-begin")]
    fn dereferencing_before_begin_panics() {
        let ll = ForwardList::from([1]);
        let _ = ll[ll.before_begin()];
    }

    #[test]
    #[should_panic(expected = "past the end")]
    fn dereferencing_end_panics() {
        let ll = ForwardList::from([1]);
        let _ = ll[ll.cend()];
    }

    #[test]
    #[should_panic(expected = "no node after")]
    fn erasing_after_last_element_panics() {
        let mut ll = ForwardList::from([1]);
        ll.erase_after(ll.begin());
    }

    #[test]
    #[should_panic(expected = "past the end")]
    fn inserting_after_end_panics() {
        let mut ll = ForwardList::from([1]);
        ll.insert_after(ll.end(), 2);
    }
}

// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test, not(feature = "loom")))]
mod proptests {
    use std::collections::VecDeque;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use proptest_derive::Arbitrary;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};
    use rand::Rng;

    use super::*;

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            failure_persistence: None,
            .. Config::default()
        })]

        #[test]
        fn forward_list_state_machine_test(
            sequential
            1..200
            =>
            ForwardList<u32>
        );
    }

    /// the position `steps` nodes after before-begin
    fn position(list: &ForwardList<u32>, steps: usize) -> Cursor<u32> {
        let mut cursor = list.cbefore_begin();
        for _ in 0..steps {
            list.advance(&mut cursor);
        }
        cursor
    }

    #[derive(Clone, Debug)]
    pub enum Transition {
        PushFront(u32),
        PushBack(u32),
        PopFront,
        /// insert after the node `.0` steps past before-begin
        InsertAfter(usize, u32),
        EraseAfter(usize),
        Clear,
        Assign(Vec<u32>),
    }

    pub struct ForwardListStateMachine;

    impl ReferenceStateMachine for ForwardListStateMachine {
        type State = VecDeque<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(VecDeque::new()).boxed()
        }

        fn transitions(state: &Self::State) -> BoxedStrategy<Self::Transition> {
            let len = state.len();
            prop_oneof![
                2 => any::<u32>().prop_map(Transition::PushFront),
                2 => any::<u32>().prop_map(Transition::PushBack),
                1 => Just(Transition::PopFront),
                3 => (0..=len, any::<u32>()).prop_map(|(at, v)| Transition::InsertAfter(at, v)),
                2 => (0..len.max(1)).prop_map(Transition::EraseAfter),
                1 => Just(Transition::Clear),
                1 => vec(any::<u32>(), 0..8).prop_map(Transition::Assign),
            ]
            .boxed()
        }

        fn preconditions(state: &Self::State, transition: &Self::Transition) -> bool {
            match transition {
                Transition::InsertAfter(at, _) => *at <= state.len(),
                Transition::EraseAfter(at) => *at < state.len(),
                _ => true,
            }
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::PushFront(value) => state.push_front(*value),
                Transition::PushBack(value) => state.push_back(*value),
                Transition::PopFront => {
                    state.pop_front();
                }
                Transition::InsertAfter(at, value) => state.insert(*at, *value),
                Transition::EraseAfter(at) => {
                    state.remove(*at);
                }
                Transition::Clear => state.clear(),
                Transition::Assign(values) => state = values.iter().copied().collect(),
            }
            state
        }
    }

    impl StateMachineTest for ForwardList<u32> {
        type SystemUnderTest = Self;
        type Reference = ForwardListStateMachine;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            Self::new()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            match transition {
                Transition::PushFront(value) => state.push_front(value),
                Transition::PushBack(value) => state.push_back(value),
                Transition::PopFront => {
                    state.pop_front();
                }
                Transition::InsertAfter(at, value) => {
                    let pos = position(&state, at);
                    let inserted = state.insert_after(pos, value);
                    assert_eq!(state[inserted], value);
                    assert_eq!(state.successor(pos), inserted);
                }
                Transition::EraseAfter(at) => {
                    let pos = position(&state, at);
                    let next = state.erase_after(pos);
                    assert_eq!(state.successor(pos), next);
                }
                Transition::Clear => state.clear(),
                Transition::Assign(values) => {
                    state.assign_from(&values.into_iter().collect());
                }
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            assert_eq!(state.len(), ref_state.len());
            assert_eq!(state.is_empty(), ref_state.is_empty());
            assert!(state.iter().eq(ref_state.iter()));

            let mut walked = 0;
            let mut cursor = state.cbegin();
            while cursor != state.cend() {
                walked += 1;
                state.advance(&mut cursor);
            }
            assert_eq!(walked, ref_state.len());
            assert_eq!(state.successor(state.cbefore_begin()), state.cbegin());
        }
    }

    #[derive(Arbitrary, Debug)]
    enum Operation {
        PushFront(u32),
        PushBack(u32),
        PopFront,
        InsertAfter(u32),
        EraseAfter,
        Clear,
        CloneAndCompare,
    }

    proptest! {
        #[test]
        #[ignore]
        fn longform(ops in vec(any::<Operation>(), 2048)) {
            println!("Executing {} operations against ForwardList", ops.len());

            let mut reference = Vec::new();
            let mut list = ForwardList::new();

            for op in ops.iter() {
                match op {
                    Operation::PushFront(i) => {
                        reference.insert(0, *i);
                        list.push_front(*i);
                    }
                    Operation::PushBack(i) => {
                        reference.push(*i);
                        list.push_back(*i);
                    }
                    Operation::PopFront => {
                        let expected = if reference.is_empty() { None } else { Some(reference.remove(0)) };
                        assert_eq!(list.pop_front(), expected);
                    }
                    Operation::InsertAfter(i) => {
                        let at = rand::thread_rng().gen_range(0..=reference.len());
                        reference.insert(at, *i);
                        list.insert_after(position(&list, at), *i);
                    }
                    Operation::EraseAfter => {
                        if !reference.is_empty() {
                            let at = rand::thread_rng().gen_range(0..reference.len());
                            reference.remove(at);
                            list.erase_after(position(&list, at));
                        }
                    }
                    Operation::Clear => {
                        reference.clear();
                        list.clear();
                    }
                    Operation::CloneAndCompare => {
                        let copy = list.clone();
                        assert_eq!(copy, list);
                        assert!(copy.iter().eq(reference.iter()));
                    }
                }
                assert_eq!(list.len(), reference.len());
            }

            assert!(list.iter().eq(reference.iter()));
            println!("Successfully executed {} operations against ForwardList", ops.len());
        }
    }
}

#[cfg(all(not(feature = "no-std"), all(test, feature = "loom")))]
mod loom_tests {
    use super::*;

    #[test]
    fn list_can_be_handed_to_another_thread() {
        loom::model(|| {
            let ll = ForwardList::from([1, 2, 3]);
            let first = ll.begin();

            let jh = loom::thread::spawn(move || {
                let mut ll = ll;
                ll.insert_after(first, 9);
                ll.push_front(0);
                ll
            });
            let ll = jh.join().expect("failed to join loom thread");

            assert_eq!(ll, ForwardList::from([0, 1, 9, 2, 3]));
            assert_eq!(ll[first], 1);
        });
    }

    #[test]
    fn lists_built_on_different_threads_get_distinct_positions() {
        loom::model(|| {
            let jh = loom::thread::spawn(|| {
                let ll = ForwardList::from([1]);
                (ll.cbefore_begin(), ll.cbegin(), ll.cend())
            });
            let ll = ForwardList::from([2]);
            let (before, first, end) = jh.join().expect("failed to join loom thread");

            assert_ne!(before, ll.cbefore_begin());
            assert_ne!(first, ll.cbegin());
            assert_ne!(end, ll.cend());
            assert_eq!(ll.get(first), None);
        });
    }
}
