//! Sequence type whose element access never conflates "no element" with
//! "a stored null".
//!
//! Array literals in scopes with sequence wrapping enabled are constructed
//! as a [`SafeArray`]. Reading index `i` yields `None` outside `[0, len)` and
//! `Some(element)` inside it, even when the element itself is a null.

use std::ops::Deref;

/// A growable sequence with checked, signed indexing.
///
/// ```
/// use nullsafe_runtime::SafeArray;
///
/// let names: SafeArray<Option<&str>> = SafeArray::from(vec![Some("a"), None]);
///
/// assert_eq!(names.get(0), Some(&Some("a")));
/// assert_eq!(names.get(1), Some(&None)); // a stored null
/// assert_eq!(names.get(2), None);        // nothing there
/// assert_eq!(names.get(-1), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SafeArray<T> {
    items: Vec<T>,
}

impl<T> SafeArray<T> {
    /// Creates an empty array.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Wraps already-constructed elements, keeping their order.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    fn position(&self, index: i64) -> Option<usize> {
        let index = usize::try_from(index).ok()?;
        (index < self.items.len()).then_some(index)
    }

    /// Returns the element at `index`, or `None` outside `[0, len)`.
    #[must_use]
    pub fn get(&self, index: i64) -> Option<&T> {
        self.position(index).map(|i| &self.items[i])
    }

    /// Mutable access with the same bounds rule as [`SafeArray::get`].
    pub fn get_mut(&mut self, index: i64) -> Option<&mut T> {
        self.position(index).map(|i| &mut self.items[i])
    }

    /// Replaces the element at `index`.
    ///
    /// Returns `false`, leaving the array untouched, when `index` is out of
    /// range; the array never grows implicitly.
    pub fn set(&mut self, index: i64, value: T) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Appends an element.
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Logical length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Unwraps into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> From<Vec<T>> for SafeArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for SafeArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Deref for SafeArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a SafeArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for SafeArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_bounds() {
        let array: SafeArray<i32> = (10..13).collect();
        let n = array.len() as i64;
        for i in -3..0 {
            assert_eq!(array.get(i), None);
        }
        for i in 0..n {
            assert_eq!(array.get(i), Some(&(10 + i as i32)));
        }
        for i in n..n + 3 {
            assert_eq!(array.get(i), None);
        }
        assert_eq!(array.get(i64::MIN), None);
        assert_eq!(array.get(i64::MAX), None);
    }

    #[test]
    fn test_stored_null_is_present() {
        let array = SafeArray::from(vec![None, Some(1)]);
        assert_eq!(array.get(0), Some(&None));
        assert_eq!(array.get(5), None);
    }

    #[test]
    fn test_set_does_not_grow() {
        let mut array = SafeArray::from(vec!['a']);
        assert!(array.set(0, 'b'));
        assert!(!array.set(1, 'c'));
        assert!(!array.set(-1, 'c'));
        assert_eq!(array.into_vec(), vec!['b']);
    }

    #[test]
    fn test_empty_array() {
        let mut array = SafeArray::<u8>::new();
        assert!(array.is_empty());
        assert_eq!(array.get(0), None);
        array.push(1);
        assert_eq!(array.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(&array[..], &[1]);
    }
}
