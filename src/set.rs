//! An ordered set implemented with an AVL tree.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

use crate::map::{AvlTreeMap, IntoIter as MapIntoIter, Iter as MapIter};

/// An ordered set implemented with an AVL tree.
///
/// ```
/// use avl_tree::AvlTreeSet;
/// let mut set = AvlTreeSet::new();
/// set.insert(0);
/// set.insert(1);
/// set.insert(2);
/// assert!(set.contains(&1));
/// set.remove(&1);
/// assert!(!set.contains(&1));
/// ```
#[derive(Clone)]
pub struct AvlTreeSet<T> {
    map: AvlTreeMap<T, ()>,
}

/// An iterator over the values of a set in ascending order.
pub struct Iter<'a, T> {
    map_iter: MapIter<'a, T, ()>,
}

/// An owning iterator over the values of a set in ascending order.
pub struct IntoIter<T> {
    map_into_iter: MapIntoIter<T, ()>,
}

impl<T: Ord> AvlTreeSet<T> {
    /// Creates an empty set.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            map: AvlTreeMap::new(),
        }
    }

    /// Returns a reference to the value in the set that is equal to the
    /// given value.
    ///
    /// The value may be any borrowed form of the set's value type, but the
    /// ordering on the borrowed form *must* match the ordering on the value
    /// type.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get_key_value(value).map(|kv| kv.0)
    }

    /// Returns true if the set contains a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(value)
    }

    /// Inserts a value into the set.
    /// Returns whether the value was inserted. Inserting a value that is
    /// already present leaves the set unchanged.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ())
    }

    /// Removes a value from the set.
    /// Returns whether the value was previously in the set.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(value).is_some()
    }

    /// Returns the value of the lowest common ancestor of two values, i.e.
    /// the first node on which the search paths for both values diverge.
    /// Returns `None` unless both values are present in the set.
    pub fn lowest_common_ancestor<Q>(&self, a: &Q, b: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.lowest_common_ancestor(a, b)
    }

    /// Returns true if the values are in strictly ascending order in an
    /// in-order traversal. Diagnostic hook, not used on any hot path.
    pub fn is_valid_bst(&self) -> bool {
        self.map.is_valid_bst()
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.map.check_consistency()
    }
}

impl<T> AvlTreeSet<T> {
    /// Returns true if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns the height of the tree.
    /// A set with a single element has height 0, an empty set has height -1.
    pub fn height(&self) -> isize {
        self.map.height()
    }

    /// Clears the set, dropping all elements.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns a reference to the smallest value in the set.
    pub fn find_min(&self) -> Option<&T> {
        self.map.find_min().map(|kv| kv.0)
    }

    /// Returns a reference to the largest value in the set.
    pub fn find_max(&self) -> Option<&T> {
        self.map.find_max().map(|kv| kv.0)
    }

    /// Returns a reference to the k-th smallest value, counting from 1.
    /// Returns `None` if `k` is zero or exceeds the number of elements.
    pub fn kth_smallest(&self, k: usize) -> Option<&T> {
        self.map.kth_smallest(k).map(|kv| kv.0)
    }

    /// Gets an iterator over the values of the set in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            map_iter: self.map.iter(),
        }
    }

    /// Visits all values in ascending order.
    pub fn traverse_inorder<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.map.traverse_inorder(|value, _| f(value));
    }

    /// Visits all values in pre-order, each node before its subtrees.
    pub fn traverse_preorder<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.map.traverse_preorder(|value, _| f(value));
    }

    /// Visits all values in post-order, each node after its subtrees.
    pub fn traverse_postorder<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.map.traverse_postorder(|value, _| f(value));
    }

    /// Visits all values level by level, top to bottom and left to right
    /// within each level.
    pub fn traverse_level_order<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.map.traverse_level_order(|value, _| f(value));
    }

    /// Returns true if every node satisfies the AVL condition and carries a
    /// correct cached height. Diagnostic hook, not used on any hot path.
    pub fn is_valid_avl(&self) -> bool {
        self.map.is_valid_avl()
    }
}

impl<T: Ord> Default for AvlTreeSet<T> {
    /// Creates an empty set.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for AvlTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTreeSet<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a AvlTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for AvlTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            map_into_iter: self.map.into_iter(),
        }
    }
}

impl<T: Ord> Extend<T> for AvlTreeSet<T> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> Extend<&'a T> for AvlTreeSet<T>
where
    T: Ord + Copy + 'a,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = &'a T>,
    {
        self.extend(iter.into_iter().copied());
    }
}

// Auto derived clone would demand T: Clone, which a borrowing iterator does
// not need.
impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            map_iter: self.map_iter.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(value, _)| value)
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        self.map_into_iter.next().map(|(value, _)| value)
    }
}
