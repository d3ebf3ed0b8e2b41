use core::fmt;
use core::marker::PhantomData;
use core::sync::atomic::Ordering;

use super::node::Handle;

cfg_if::cfg_if! {
    if #[cfg(all(not(feature = "no-std"), all(test, feature = "loom")))] {
        use loom::sync::atomic::AtomicUsize;

        loom::lazy_static! {
            static ref NEXT_LIST_ID: AtomicUsize = AtomicUsize::new(1);
        }
    } else {
        use core::sync::atomic::AtomicUsize;

        static NEXT_LIST_ID: AtomicUsize = AtomicUsize::new(1);
    }
}

/// identifies the list or storage a cursor was issued from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ListId(usize);

impl ListId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Position {
    Node(Handle),
    End,
}

mod sealed {
    pub trait Sealed {}
}

/// the capability a cursor grants when it is dereferenced through its list
pub trait Access: sealed::Sealed {}

/// cursors that may hand out `&mut T`
#[derive(Debug)]
pub enum Mutable {}

/// cursors that only hand out `&T`
#[derive(Debug)]
pub enum ReadOnly {}

impl sealed::Sealed for Mutable {}
impl sealed::Sealed for ReadOnly {}
impl Access for Mutable {}
impl Access for ReadOnly {}

/// A forward-only position in a [`ForwardList`](super::ForwardList).
///
/// A cursor is a plain handle: it does not borrow the list, so it can be kept
/// around while the list is mutated and passed back into `insert_after` or
/// `erase_after`. Reading through it, or moving it forward, goes through the
/// list that issued it. A cursor either references a node (the before-begin
/// sentinel or an element) or is the end position.
///
/// Element positions follow their node: they are tied to the list's storage,
/// which moves between lists on `swap`. The before-begin and end positions
/// are tied to the list itself and stay with it across `swap` and `clear`.
///
/// Two cursors are equal when they reference the same node, regardless of
/// their capability.
pub struct BasicCursor<T, A: Access> {
    pub(crate) list: ListId,
    pub(crate) position: Position,
    _marker: PhantomData<(fn() -> T, A)>,
}

/// a cursor that can be used to modify the element it references
pub type CursorMut<T> = BasicCursor<T, Mutable>;

/// a cursor that can only be used to read the element it references
pub type Cursor<T> = BasicCursor<T, ReadOnly>;

impl<T, A: Access> BasicCursor<T, A> {
    pub(crate) fn new(list: ListId, position: Position) -> Self {
        Self {
            list,
            position,
            _marker: PhantomData,
        }
    }

    /// returns true if this is the end position
    pub fn is_end(&self) -> bool {
        self.position == Position::End
    }

    /// view this position as a read-only cursor
    pub fn as_read_only(&self) -> Cursor<T> {
        BasicCursor::new(self.list, self.position)
    }
}

impl<T> From<CursorMut<T>> for Cursor<T> {
    fn from(cursor: CursorMut<T>) -> Self {
        cursor.as_read_only()
    }
}

impl<T, A: Access> Clone for BasicCursor<T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Access> Copy for BasicCursor<T, A> {}

impl<T, A: Access, B: Access> PartialEq<BasicCursor<T, B>> for BasicCursor<T, A> {
    fn eq(&self, other: &BasicCursor<T, B>) -> bool {
        self.list == other.list && self.position == other.position
    }
}

impl<T, A: Access> Eq for BasicCursor<T, A> {}

impl<T, A: Access> fmt::Debug for BasicCursor<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Position::Node(handle) => f
                .debug_struct("Cursor")
                .field("list", &self.list.0)
                .field("index", &handle.index)
                .field("generation", &handle.generation)
                .finish(),
            Position::End => f
                .debug_struct("Cursor")
                .field("list", &self.list.0)
                .field("end", &true)
                .finish(),
        }
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod test {
    use super::*;

    fn at(list: ListId, index: usize) -> CursorMut<u32> {
        BasicCursor::new(
            list,
            Position::Node(Handle {
                index,
                generation: 0,
            }),
        )
    }

    #[test]
    fn list_ids_are_unique() {
        let a = ListId::next();
        let b = ListId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn cursors_compare_by_node_identity() {
        let list = ListId::next();
        assert_eq!(at(list, 1), at(list, 1));
        assert_ne!(at(list, 1), at(list, 2));
        assert_ne!(at(list, 1), at(ListId::next(), 1));
    }

    #[test]
    fn cursors_compare_across_capabilities() {
        let list = ListId::next();
        let mutable = at(list, 3);
        let read_only: Cursor<u32> = mutable.into();
        assert_eq!(mutable, read_only);
        assert_eq!(read_only, mutable);
    }

    #[test]
    fn end_is_only_equal_to_end() {
        let list = ListId::next();
        let end = Cursor::<u32>::new(list, Position::End);
        assert!(end.is_end());
        assert_eq!(end, Cursor::<u32>::new(list, Position::End));
        assert_ne!(end, at(list, 0));
    }
}
