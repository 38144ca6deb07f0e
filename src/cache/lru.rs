//! LRU Recency List Module
//!
//! Doubly linked list of keys stored in an index-based arena. Nodes are
//! addressed by [`NodeId`], so the cache can keep an id next to each entry and
//! move, unlink or evict that key in O(1).

// == Node Id ==
/// Handle to a node in a [`RecencyList`].
///
/// Only valid until the node is removed; slots are recycled afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Keys ordered by recency of use.
///
/// - Front = Least recently used
/// - Back = Most recently used
#[derive(Debug)]
pub struct RecencyList<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecencyList<K> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    // == Push Back ==
    /// Appends `key` as the most recently used node.
    pub fn push_back(&mut self, key: K) -> NodeId {
        let node = Node {
            key,
            prev: self.tail,
            next: None,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;

        NodeId(idx)
    }

    // == Move To Back ==
    /// Marks a node as most recently used.
    pub fn move_to_back(&mut self, id: NodeId) {
        if self.tail == Some(id.0) {
            return;
        }

        self.unlink(id.0);

        let tail = self.tail;
        {
            let node = self.node_mut(id.0);
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(tail) => self.node_mut(tail).next = Some(id.0),
            None => self.head = Some(id.0),
        }
        self.tail = Some(id.0);
    }

    // == Remove ==
    /// Unlinks a node and returns its key.
    pub fn remove(&mut self, id: NodeId) -> Option<K> {
        self.slots.get(id.0)?.as_ref()?;

        self.unlink(id.0);
        let node = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;

        Some(node.key)
    }

    // == Pop Front ==
    /// Removes and returns the least recently used key.
    pub fn pop_front(&mut self) -> Option<K> {
        let head = self.head?;
        self.remove(NodeId(head))
    }

    // == Iteration ==
    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Clear ==
    /// Drops every node and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Length ==
    /// Returns the number of linked keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    // Linked indices always point at occupied slots.
    fn node(&self, idx: usize) -> &Node<K> {
        match &self.slots[idx] {
            Some(node) => node,
            None => unreachable!("recency list link points at a vacant slot"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K> {
        match &mut self.slots[idx] {
            Some(node) => node,
            None => unreachable!("recency list link points at a vacant slot"),
        }
    }
}

// == Iterator ==
/// Iterator over keys from least to most recently used.
pub struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    cursor: Option<usize>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?);
        self.cursor = node.next;
        Some(&node.key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<String> = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.iter().next().is_none());
    }

    #[test]
    fn test_push_back_orders_oldest_first() {
        let mut list = RecencyList::new();

        list.push_back("key1");
        list.push_back("key2");
        list.push_back("key3");

        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().next(), Some(&"key1"));
        assert_eq!(list.iter().last(), Some(&"key3"));
        assert_eq!(keys(&list), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_move_to_back() {
        let mut list = RecencyList::new();

        let a = list.push_back("a");
        list.push_back("b");
        list.push_back("c");

        list.move_to_back(a);

        assert_eq!(list.iter().next(), Some(&"b"));
        assert_eq!(keys(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_middle_and_tail() {
        let mut list = RecencyList::new();

        list.push_back("a");
        let b = list.push_back("b");
        let c = list.push_back("c");

        list.move_to_back(b);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        // Already most recent
        list.move_to_back(b);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);

        list.move_to_back(c);
        assert_eq!(keys(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pop_front() {
        let mut list = RecencyList::new();

        list.push_back("key1");
        list.push_back("key2");
        list.push_back("key3");

        assert_eq!(list.pop_front(), Some("key1"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.pop_front(), Some("key2"));
        assert_eq!(list.pop_front(), Some("key3"));
        assert_eq!(list.pop_front(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_relinks_neighbours() {
        let mut list = RecencyList::new();

        list.push_back("key1");
        let key2 = list.push_back("key2");
        list.push_back("key3");

        assert_eq!(list.remove(key2), Some("key2"));
        assert_eq!(list.len(), 2);
        assert_eq!(keys(&list), vec!["key1", "key3"]);

        // Removing twice is a no-op
        assert_eq!(list.remove(key2), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_only_node() {
        let mut list = RecencyList::new();
        let only = list.push_back("only");

        assert_eq!(list.remove(only), Some("only"));
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut list = RecencyList::with_capacity(2);

        let a = list.push_back("a");
        list.push_back("b");
        list.remove(a);
        let c = list.push_back("c");

        assert_eq!(c, a, "freed slot should be reused");
        assert_eq!(keys(&list), vec!["b", "c"]);
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::new();
        list.push_back("a");
        list.push_back("b");

        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);

        list.push_back("c");
        assert_eq!(keys(&list), vec!["c"]);
    }

    #[test]
    fn test_lru_access_sequence() {
        let mut list = RecencyList::new();

        let a = list.push_back("a");
        let b = list.push_back("b");
        let c = list.push_back("c");

        list.move_to_back(a);
        list.move_to_back(c);
        list.move_to_back(b);

        assert_eq!(list.pop_front(), Some("a"));
        assert_eq!(list.pop_front(), Some("c"));
        assert_eq!(list.pop_front(), Some("b"));
    }
}
