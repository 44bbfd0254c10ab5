//! An ordered map and a set implemented with an AVL tree.
//!
//! The tree rebalances itself after every insert and remove, so its height
//! stays logarithmic in the number of elements no matter in which order keys
//! arrive. Besides the usual map and set operations it answers
//! order-statistic (k-th smallest) and lowest common ancestor queries, and
//! it exposes validators for the search tree and balance invariants.
//!
//! ```
//! use avl_tree::AvlTreeSet;
//!
//! let mut set = AvlTreeSet::new();
//! for x in [5, 3, 7, 1, 9] {
//!     set.insert(x);
//! }
//! assert_eq!(set.find_min(), Some(&1));
//! assert_eq!(set.kth_smallest(2), Some(&3));
//! assert!(set.is_valid_avl());
//! ```

pub mod map;
pub mod set;

pub use map::AvlTreeMap;
pub use set::AvlTreeSet;
