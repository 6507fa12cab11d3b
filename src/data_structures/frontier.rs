use indexmap::IndexSet;
use std::hash::Hash;

/// Work set of an evaluation pass: a pending set items are popped from,
/// and a deferred set for items that were popped too early.
///
/// Pushing an item that is already pending is a no-op, so every item is held at most once.
/// [Frontier::readmit] moves every deferred item back into the pending set.
///
/// # Example
/// ```
/// # use rothsim::data_structures::Frontier;
/// let mut frontier = Frontier::new();
///
/// frontier.push(1);
/// frontier.push(2);
/// frontier.push(1);
/// assert_eq!(frontier.len(), 2);
///
/// let item = frontier.pop().unwrap();
/// frontier.defer(item);
/// assert_eq!(frontier.deferred().count(), 1);
///
/// frontier.readmit();
/// assert_eq!(frontier.deferred().count(), 0);
/// assert_eq!(frontier.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Frontier<T: Hash + Eq> {
    pending: IndexSet<T>,
    deferred: IndexSet<T>,
}

impl<T: Hash + Eq> Frontier<T> {
    /// Returns an empty [Frontier].
    pub fn new() -> Self {
        Self {
            pending: Default::default(),
            deferred: Default::default(),
        }
    }

    /// Removes and returns the most recently pushed pending item.
    /// If nothing is pending, returns None.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        self.pending.pop()
    }

    /// Adds an item to the pending set, returns false if it was already pending.
    #[inline(always)]
    pub fn push(&mut self, v: T) -> bool {
        self.pending.insert(v)
    }

    /// Adds all the items in the iterator to the pending set.
    #[inline(always)]
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.pending.extend(iter)
    }

    /// Parks an item in the deferred set until the next [Frontier::readmit].
    #[inline(always)]
    pub fn defer(&mut self, v: T) {
        self.deferred.insert(v);
    }

    /// Moves every deferred item back into the pending set.
    pub fn readmit(&mut self) {
        let deferred = std::mem::take(&mut self.deferred);
        self.pending.extend(deferred);
    }

    /// Returns an iterator over the deferred items, in the order they were deferred.
    pub fn deferred(&self) -> impl Iterator<Item = &T> {
        self.deferred.iter()
    }

    /// Empties both sets.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deferred.clear();
    }

    /// Returns the number of pending items.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending, deferred items are not counted.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T: Hash + Eq> Default for Frontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> FromIterator<T> for Frontier<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            pending: iter.into_iter().collect(),
            deferred: Default::default(),
        }
    }
}
