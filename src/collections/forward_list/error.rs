use core::fmt;

pub type ForwardListResult<T> = Result<T, ForwardListError>;

/// a cursor was used in a way the list cannot honour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardListError {
    /// the cursor was issued by a different list, or references a node that
    /// was swapped into a different list
    ForeignPosition,
    /// the node the cursor referenced has since been erased
    StalePosition,
    /// the cursor is the end position, which references no node
    PastTheEnd,
    /// the cursor is the before-begin position, which holds no element
    BeforeBegin,
    /// erase-after was asked to remove a node that does not exist
    NoSuccessor,
}

impl fmt::Display for ForwardListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::ForeignPosition => "cursor does not belong to this list",
            Self::StalePosition => "cursor references an erased node",
            Self::PastTheEnd => "cursor is past the end of the list",
            Self::BeforeBegin => "cursor is the before-begin position and holds no element",
            Self::NoSuccessor => "there is no node after the cursor",
        };
        f.write_str(msg)
    }
}

#[cfg(not(feature = "no-std"))]
impl std::error::Error for ForwardListError {}

/// unwrap a checked result, reporting a precondition violation at the caller
#[track_caller]
pub(crate) fn expect_valid<T>(result: ForwardListResult<T>) -> T {
    match result {
        Ok(t) => t,
        Err(e) => panic!("forward list precondition violated: {}", e),
    }
}
