//! Reference-counted storage shared by vector and matrix views.

use std::cell::RefCell;
use std::rc::Rc;

/// Contiguous `f64` storage shared by any number of views.
///
/// Cloning a `Buffer` bumps the reference count; the allocation is released
/// when the last clone drops. Contents are mutable through every clone, the
/// size never changes after creation. Overlapping views over one buffer are
/// intentional: a write through one view is visible through all others.
///
/// Buffers are deliberately `Rc`-based rather than `Arc`-based; the whole
/// library is single-threaded and the types are `!Send`/`!Sync`.
#[derive(Clone, Debug)]
pub struct Buffer {
    data: Rc<RefCell<Vec<f64>>>,
}

impl Buffer {
    /// Allocate zero-initialized storage.
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![0.0; len])
    }

    /// Take ownership of existing values.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Buffer {
            data: Rc::new(RefCell::new(values)),
        }
    }

    /// Total number of stored elements.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live handles (this one included) sharing the storage.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.data)
    }

    /// Whether two handles alias one allocation.
    pub fn shares(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&[f64]) -> R) -> R {
        f(&self.data.borrow())
    }

    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut [f64]) -> R) -> R {
        f(&mut self.data.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed() {
        let buf = Buffer::zeroed(4);
        assert_eq!(buf.len(), 4);
        buf.with(|data| assert!(data.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_ref_count_tracks_clones() {
        let buf = Buffer::zeroed(2);
        assert_eq!(buf.ref_count(), 1);
        let alias = buf.clone();
        assert_eq!(buf.ref_count(), 2);
        assert!(buf.shares(&alias));
        drop(alias);
        assert_eq!(buf.ref_count(), 1);
    }

    #[test]
    fn test_writes_visible_through_aliases() {
        let buf = Buffer::from_vec(vec![1.0, 2.0]);
        let alias = buf.clone();
        buf.with_mut(|data| data[1] = 9.0);
        alias.with(|data| assert_eq!(data[1], 9.0));
    }

    #[test]
    fn test_distinct_buffers_do_not_share() {
        let a = Buffer::zeroed(1);
        let b = Buffer::zeroed(1);
        assert!(!a.shares(&b));
    }
}
