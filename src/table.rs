//! The aggregated snippet table: language key to ordered snippet sequence.
//!
//! Bucket order is source order, then file order, then in-file order, and is
//! what completion lists display. The table also derives the two views the
//! completion-registration boundary needs: the merged per-language sequence
//! (global bucket ++ language bucket) and the trigger characters for it.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::loader::LanguageBuckets;
use crate::snippet::{NormalizedSnippet, GLOBAL_LANGUAGE};

/// Mapping from language key (lower-cased tag, or `"*"`) to an ordered
/// sequence of snippets.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SnippetTable {
    buckets: LanguageBuckets,
}

impl SnippetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// All language keys, global sentinel included, in sorted order.
    pub fn language_keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Language keys excluding the global sentinel.
    pub fn scoped_language_keys(&self) -> impl Iterator<Item = &str> {
        self.language_keys().filter(|key| *key != GLOBAL_LANGUAGE)
    }

    /// The bucket for one language key, empty if absent.
    pub fn bucket(&self, language: &str) -> &[Arc<NormalizedSnippet>] {
        self.buckets
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append a folder's buckets, preserving per-bucket order.
    pub fn extend_from(&mut self, buckets: LanguageBuckets) {
        for (language, snippets) in buckets {
            self.buckets.entry(language).or_default().extend(snippets);
        }
    }

    /// Total entries across all buckets.
    pub fn total_entries(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether only the global bucket exists (the catch-all case: the global
    /// sequence is offered for any file).
    pub fn has_only_global(&self) -> bool {
        !self.is_empty() && self.scoped_language_keys().next().is_none()
    }

    /// The merged completion sequence for a language: the global bucket
    /// followed by that language's own bucket.
    pub fn completions_for(&self, language: &str) -> Vec<Arc<NormalizedSnippet>> {
        let language = language.to_lowercase();
        let mut merged: Vec<Arc<NormalizedSnippet>> = self.bucket(GLOBAL_LANGUAGE).to_vec();
        if language != GLOBAL_LANGUAGE {
            merged.extend_from_slice(self.bucket(&language));
        }
        merged
    }

    /// Distinct final characters of all prefixes in the merged sequence for a
    /// language, in sorted order.
    pub fn trigger_characters(&self, language: &str) -> Vec<char> {
        let mut characters = BTreeSet::new();
        for snippet in self.completions_for(language) {
            for prefix in &snippet.prefixes {
                if let Some(last) = prefix.chars().last() {
                    characters.insert(last);
                }
            }
        }
        characters.into_iter().collect()
    }
}
