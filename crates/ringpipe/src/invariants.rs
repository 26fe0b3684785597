//! Debug assertion macros for ring buffer invariants.
//!
//! They are only active in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds.

// =============================================================================
// Bounded Count
// =============================================================================

/// Assert that the unread count leaves the sentinel slot empty.
///
/// **Invariant**: `(write - read) mod capacity ≤ capacity - 1`
///
/// Used in: `State::put_from()` after advancing the write index
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count < $capacity,
            "bounded count violated: {} unread bytes in a ring of capacity {}",
            $count,
            $capacity
        )
    };
}

// =============================================================================
// Index Range
// =============================================================================

/// Assert that a ring index stays inside the storage.
///
/// **Invariant**: `0 ≤ index < capacity`
///
/// Used in: `State::put_from()` and `State::take_into()` after wrapping
macro_rules! debug_assert_index_in_range {
    ($name:literal, $index:expr, $capacity:expr) => {
        debug_assert!(
            $index < $capacity,
            "index range violated: {} is {} but capacity is {}",
            $name,
            $index,
            $capacity
        )
    };
}

// =============================================================================
// Closed Ring Is Empty
// =============================================================================

/// Assert that a closed ring reports nothing to read.
///
/// **Invariant**: `closed → read == write == 0`
///
/// Used in: `SharedRingBuffer::mark_closed()`
macro_rules! debug_assert_closed_empty {
    ($closed:expr, $read:expr, $write:expr) => {
        debug_assert!(
            !$closed || ($read == 0 && $write == 0),
            "closed ring still holds indices read={} write={}",
            $read,
            $write
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_closed_empty;
pub(crate) use debug_assert_index_in_range;
