//! Prefix tree for autocomplete
//!
//! Holds every term ever inserted since the last `clear`. Nodes are never
//! pruned, so a word can outlive its last posting.

use std::collections::{BTreeMap, VecDeque};

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Complete word ending at this node
    word: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PrefixTrie {
    root: TrieNode,
    words: usize,
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word; empty words are ignored
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        if node.word.is_none() {
            node.word = Some(word.to_string());
            self.words += 1;
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.word.is_some())
    }

    /// Words under `prefix`, breadth-first, at most `max` of them
    ///
    /// Shorter completions come first; siblings are visited in character
    /// order. The prefix itself is included when it is a word.
    pub fn suggestions(&self, prefix: &str, max: usize) -> Vec<String> {
        let mut suggestions = Vec::new();
        if max == 0 {
            return suggestions;
        }
        let Some(start) = self.find(prefix) else {
            return suggestions;
        };

        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            if let Some(word) = &node.word {
                suggestions.push(word.clone());
                if suggestions.len() >= max {
                    break;
                }
            }
            queue.extend(node.children.values());
        }

        suggestions
    }

    /// Number of distinct words stored
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn clear(&mut self) {
        self.root = TrieNode::default();
        self.words = 0;
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}
