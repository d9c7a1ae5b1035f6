//! Disjoint-set forest over slot indices

/// Union-find with path halving and union by rank
///
/// Only activated elements count as components, so a forest sized to the
/// whole region reports the number of connected groups among placed tiles.
#[derive(Clone, Debug)]
pub struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
    active: Vec<bool>,
}

impl DisjointSets {
    /// Create `len` singleton sets, all inactive
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            active: vec![false; len],
        }
    }

    /// Mark an element as taking part in component counting
    pub fn activate(&mut self, element: usize) {
        if let Some(flag) = self.active.get_mut(element) {
            *flag = true;
        }
    }

    /// Whether an element has been activated
    pub fn is_active(&self, element: usize) -> bool {
        self.active.get(element).copied().unwrap_or(false)
    }

    /// Representative of an element's set
    pub fn find(&mut self, element: usize) -> usize {
        let mut current = element;
        while let Some(&parent) = self.parent.get(current) {
            if parent == current {
                return current;
            }
            let grandparent = self.parent.get(parent).copied().unwrap_or(parent);
            if let Some(link) = self.parent.get_mut(current) {
                *link = grandparent;
            }
            current = grandparent;
        }
        current
    }

    /// Merge the sets of two elements, returning whether they were separate
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        let rank_a = self.rank.get(root_a).copied().unwrap_or(0);
        let rank_b = self.rank.get(root_b).copied().unwrap_or(0);
        let (child, root) = if rank_a < rank_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        if let Some(link) = self.parent.get_mut(child) {
            *link = root;
        }
        if rank_a == rank_b {
            if let Some(rank) = self.rank.get_mut(root) {
                *rank = rank.saturating_add(1);
            }
        }
        true
    }

    /// Whether two elements share a set
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of distinct sets among active elements
    pub fn component_count(&mut self) -> usize {
        let mut roots: Vec<usize> = (0..self.parent.len())
            .filter(|&element| self.is_active(element))
            .collect();
        for element in &mut roots {
            *element = self.find(*element);
        }
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest has no elements
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
