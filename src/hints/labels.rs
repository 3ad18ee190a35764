//! Hint label generation
//!
//! Prefix-free labels are built greedily: start from the single characters
//! of the alphabet, and while there are fewer candidates than targets,
//! replace the cheapest candidate with all of its one-character extensions.
//! Because an expanded label is removed from the pool, no label is ever a
//! prefix of another, so typing a full label is always unambiguous.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Characters available for labels, each with a typing cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintAlphabet {
    /// Deduplicated, in ascending (cost, original position) order
    chars: Vec<(char, u32)>,
}

impl HintAlphabet {
    /// Alphabet where every character costs the same
    pub fn uniform(chars: &str) -> Self {
        Self::weighted(chars, &HashMap::new())
    }

    /// Alphabet with per-character costs; missing characters cost 1
    pub fn weighted(chars: &str, weights: &HashMap<char, u32>) -> Self {
        let mut seen = Vec::new();
        for c in chars.chars() {
            if !seen.iter().any(|&(existing, _)| existing == c) {
                seen.push((c, weights.get(&c).copied().unwrap_or(1)));
            }
        }
        // Stable sort keeps alphabet order for equal costs
        seen.sort_by_key(|&(_, cost)| cost);
        Self { chars: seen }
    }

    /// Drop characters that are bound as single keys in hint mode
    pub fn without(mut self, excluded: &[char]) -> Self {
        self.chars.retain(|(c, _)| !excluded.contains(c));
        self
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().map(|&(c, _)| c)
    }

    /// Generate up to `count` prefix-free labels, cheapest first
    ///
    /// Alphabets with fewer than two characters cannot be extended, so they
    /// yield at most one label per character.
    pub fn assign(&self, count: usize) -> Vec<String> {
        if count == 0 || self.chars.is_empty() {
            return Vec::new();
        }

        // (cost, insertion order) gives a deterministic total order; costs
        // are u64 sums of u32 weights
        let mut heap: BinaryHeap<Reverse<(u64, u64, String)>> = BinaryHeap::new();
        let mut order = 0u64;
        for &(c, cost) in &self.chars {
            heap.push(Reverse((u64::from(cost), order, c.to_string())));
            order += 1;
        }

        while heap.len() < count && self.chars.len() >= 2 {
            let Some(Reverse((cost, _, label))) = heap.pop() else {
                break;
            };
            for &(c, char_cost) in &self.chars {
                let mut extended = String::with_capacity(label.len() + c.len_utf8());
                extended.push_str(&label);
                extended.push(c);
                heap.push(Reverse((cost.saturating_add(u64::from(char_cost)), order, extended)));
                order += 1;
            }
        }

        let mut labels = Vec::with_capacity(count.min(heap.len()));
        while labels.len() < count {
            match heap.pop() {
                Some(Reverse((_, _, label))) => labels.push(label),
                None => break,
            }
        }
        labels
    }
}

/// Labels `"1"` through `count`
pub fn numeric(count: usize) -> Vec<String> {
    (1..=count).map(|n| n.to_string()).collect()
}
