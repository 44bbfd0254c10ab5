//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;
use std::mem;

/// An ordered map implemented with an AVL tree.
///
/// Keys are kept in ascending order and the tree is rebalanced after every
/// structural change, so that lookups, inserts and removals run in O(log n).
/// Inserting a key that is already present leaves the map unchanged and does
/// not overwrite the stored value.
///
/// ```
/// use avl_tree::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: isize,
}

/// An iterator over the entries of a map in ascending key order.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

/// An owning iterator over the entries of a map in ascending key order.
pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
            }
        }
        None
    }

    /// Returns true if the map contains a value for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    /// Returns whether the pair was inserted. If the key was already present
    /// the map is left unchanged, including the stored value.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let (root, inserted) = Self::insert_at(self.root.take(), key, value);
        self.root = Some(root);
        if inserted {
            self.num_nodes += 1;
        }
        inserted
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = Self::remove_at(self.root.take(), key);
        self.root = root;
        if removed.is_some() {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
        }
        removed.map(|(_, value)| value)
    }

    /// Returns the key of the lowest common ancestor of two keys, i.e. the
    /// first node on which the search paths for both keys diverge.
    /// Returns `None` unless both keys are present in the map.
    pub fn lowest_common_ancestor<Q>(&self, a: &Q, b: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains_key(a) || !self.contains_key(b) {
            return None;
        }
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            let ord_a = a.cmp(node.key.borrow());
            let ord_b = b.cmp(node.key.borrow());
            if ord_a == Ordering::Less && ord_b == Ordering::Less {
                current = node.left.as_deref();
            } else if ord_a == Ordering::Greater && ord_b == Ordering::Greater {
                current = node.right.as_deref();
            } else {
                // Paths diverge here, or one key is stored at this node.
                return Some(&node.key);
            }
        }
        None
    }

    /// Returns true if the keys are in strictly ascending order in an
    /// in-order traversal. Diagnostic hook, not used on any hot path.
    pub fn is_valid_bst(&self) -> bool {
        let mut iter = self.iter();
        if let Some((mut previous, _)) = iter.next() {
            for (key, _) in iter {
                if previous >= key {
                    return false;
                }
                previous = key;
            }
        }
        true
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        assert!(self.is_valid_bst());
        assert!(self.is_valid_avl());

        let mut num_nodes = 0;
        self.traverse_inorder(|_, _| num_nodes += 1);
        assert_eq!(num_nodes, self.num_nodes);
    }

    fn insert_at(link: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, bool) {
        match link {
            None => (Box::new(Node::new(key, value)), true),
            Some(mut node) => {
                let inserted = match key.cmp(&node.key) {
                    Ordering::Less => {
                        let (left, inserted) = Self::insert_at(node.left.take(), key, value);
                        node.left = Some(left);
                        inserted
                    }
                    Ordering::Greater => {
                        let (right, inserted) = Self::insert_at(node.right.take(), key, value);
                        node.right = Some(right);
                        inserted
                    }
                    Ordering::Equal => false,
                };
                if inserted {
                    node = Self::rebalance(node);
                }
                (node, inserted)
            }
        }
    }

    fn remove_at<Q>(link: Link<K, V>, key: &Q) -> (Link<K, V>, Option<(K, V)>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match link {
            None => (None, None),
            Some(mut node) => {
                let removed = match key.cmp(node.key.borrow()) {
                    Ordering::Less => {
                        let (left, removed) = Self::remove_at(node.left.take(), key);
                        node.left = left;
                        removed
                    }
                    Ordering::Greater => {
                        let (right, removed) = Self::remove_at(node.right.take(), key);
                        node.right = right;
                        removed
                    }
                    Ordering::Equal => {
                        return match (node.left.take(), node.right.take()) {
                            (None, None) => {
                                let node = *node;
                                (None, Some((node.key, node.value)))
                            }
                            (Some(child), None) | (None, Some(child)) => {
                                // The child subtree is untouched and stays
                                // balanced, only the ancestors need repair.
                                let node = *node;
                                (Some(child), Some((node.key, node.value)))
                            }
                            (Some(left), Some(right)) => {
                                // Move the in-order successor into this node,
                                // then remove the successor from the right
                                // subtree.
                                let (right, (successor_key, successor_value)) =
                                    Self::remove_min_at(right);
                                node.left = Some(left);
                                node.right = right;
                                let key = mem::replace(&mut node.key, successor_key);
                                let value = mem::replace(&mut node.value, successor_value);
                                (Some(Self::rebalance(node)), Some((key, value)))
                            }
                        };
                    }
                };
                if removed.is_some() {
                    node = Self::rebalance(node);
                }
                (Some(node), removed)
            }
        }
    }

    // Removes the leftmost node of a non-empty subtree and returns its entry.
    fn remove_min_at(mut node: Box<Node<K, V>>) -> (Link<K, V>, (K, V)) {
        match node.left.take() {
            None => {
                let node = *node;
                (node.right, (node.key, node.value))
            }
            Some(left) => {
                let (left, min) = Self::remove_min_at(left);
                node.left = left;
                (Some(Self::rebalance(node)), min)
            }
        }
    }

    /// Restores the AVL condition (balance) at the given node if necessary
    /// and repairs its cached height. The children's heights must already be
    /// correct and the initial height difference must not exceed 2, which
    /// always holds after a single update one level below.
    /// Returns the new subtree root.
    fn rebalance(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        node.update_height();
        let balance = node.balance_factor();
        debug_assert!((-2..=2).contains(&balance));
        if balance > 1 {
            // Left subtree is too tall
            if balance_factor(&node.left) < 0 {
                let left = node.left.take().unwrap();
                node.left = Some(Self::rotate_left(left));
            }
            Self::rotate_right(node)
        } else if balance < -1 {
            // Right subtree is too tall
            if balance_factor(&node.right) > 0 {
                let right = node.right.take().unwrap();
                node.right = Some(Self::rotate_right(right));
            }
            Self::rotate_left(node)
        } else {
            node
        }
    }

    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut pivot = node.right.take().unwrap();
        node.right = pivot.left.take();
        node.update_height();
        pivot.left = Some(node);
        pivot.update_height();
        pivot
    }

    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut pivot = node.left.take().unwrap();
        node.left = pivot.right.take();
        node.update_height();
        pivot.right = Some(node);
        pivot.update_height();
        pivot
    }
}

impl<K, V> AvlTreeMap<K, V> {
    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree.
    /// A map with a single element has height 0, an empty map has height -1.
    pub fn height(&self) -> isize {
        height(&self.root)
    }

    /// Clears the map, dropping all elements.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns references to the entry with the smallest key in the map.
    pub fn find_min(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns references to the entry with the largest key in the map.
    pub fn find_max(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Returns references to the entry with the k-th smallest key, counting
    /// from 1. Returns `None` if `k` is zero or exceeds the number of
    /// elements.
    ///
    /// Runs in O(k): the in-order walk stops after the k-th visited node.
    /// No per-node subtree size is cached, so an O(log n) rank query would
    /// require extending the node layout.
    pub fn kth_smallest(&self, k: usize) -> Option<(&K, &V)> {
        if k == 0 || k > self.num_nodes {
            return None;
        }
        let mut remaining = k;
        let mut stack: Vec<&Node<K, V>> = Vec::new();
        let mut current = self.root.as_deref();
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            let node = stack.pop()?;
            remaining -= 1;
            if remaining == 0 {
                return Some((&node.key, &node.value));
            }
            current = node.right.as_deref();
        }
    }

    /// Gets an iterator over the entries of the map in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    /// Visits all entries in ascending key order.
    pub fn traverse_inorder<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        Self::inorder_at(&self.root, &mut f);
    }

    /// Visits all entries in pre-order, each node before its subtrees.
    pub fn traverse_preorder<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        Self::preorder_at(&self.root, &mut f);
    }

    /// Visits all entries in post-order, each node after its subtrees.
    pub fn traverse_postorder<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        Self::postorder_at(&self.root, &mut f);
    }

    /// Visits all entries level by level, top to bottom and left to right
    /// within each level.
    pub fn traverse_level_order<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        let mut queue = VecDeque::new();
        if let Some(node) = self.root.as_deref() {
            queue.push_back(node);
        }
        while let Some(node) = queue.pop_front() {
            f(&node.key, &node.value);
            if let Some(left) = node.left.as_deref() {
                queue.push_back(left);
            }
            if let Some(right) = node.right.as_deref() {
                queue.push_back(right);
            }
        }
    }

    /// Returns true if every node satisfies the AVL condition and carries a
    /// correct cached height. Diagnostic hook, not used on any hot path.
    pub fn is_valid_avl(&self) -> bool {
        Self::checked_height(&self.root).is_some()
    }

    fn inorder_at<F>(link: &Link<K, V>, f: &mut F)
    where
        F: FnMut(&K, &V),
    {
        if let Some(node) = link {
            Self::inorder_at(&node.left, f);
            f(&node.key, &node.value);
            Self::inorder_at(&node.right, f);
        }
    }

    fn preorder_at<F>(link: &Link<K, V>, f: &mut F)
    where
        F: FnMut(&K, &V),
    {
        if let Some(node) = link {
            f(&node.key, &node.value);
            Self::preorder_at(&node.left, f);
            Self::preorder_at(&node.right, f);
        }
    }

    fn postorder_at<F>(link: &Link<K, V>, f: &mut F)
    where
        F: FnMut(&K, &V),
    {
        if let Some(node) = link {
            Self::postorder_at(&node.left, f);
            Self::postorder_at(&node.right, f);
            f(&node.key, &node.value);
        }
    }

    // Recomputes the height of the subtree from scratch, returning None if
    // the AVL condition is violated anywhere or a cached height is stale.
    fn checked_height(link: &Link<K, V>) -> Option<isize> {
        match link {
            None => Some(-1),
            Some(node) => {
                let left_height = Self::checked_height(&node.left)?;
                let right_height = Self::checked_height(&node.right)?;
                if (left_height - right_height).abs() > 1 {
                    return None;
                }
                let node_height = 1 + cmp::max(left_height, right_height);
                if node.height != node_height {
                    return None;
                }
                Some(node_height)
            }
        }
    }
}

// Height of a possibly absent subtree.
// An absent subtree has height -1, a leaf node has height 0.
fn height<K, V>(link: &Link<K, V>) -> isize {
    link.as_ref().map_or(-1, |node| node.height)
}

// Height difference between the left and right subtree of a link.
// Only meaningful for links that are known to be present.
fn balance_factor<K, V>(link: &Link<K, V>) -> isize {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 0,
        }
    }

    // Must run again after any structural change beneath this node and
    // before any ancestor reads the cached height.
    fn update_height(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));
    }

    fn balance_factor(&self) -> isize {
        height(&self.left) - height(&self.right)
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(mut self) -> Self::IntoIter {
        self.num_nodes = 0;
        IntoIter::new(self.root.take())
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: &'a Link<K, V>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

// Auto derived clone would demand K: Clone and V: Clone, which a borrowing
// iterator does not need.
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}

impl<K, V> IntoIter<K, V> {
    fn new(root: Link<K, V>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        let right = node.right.take();
        self.push_left_spine(right);
        let node = *node;
        Some((node.key, node.value))
    }
}
