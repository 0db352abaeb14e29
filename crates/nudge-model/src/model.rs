//! Continuation tables
//!
//! Each bucket maps a bigram to every token observed right after it. Repeats
//! are kept: a token seen three times appears three times, so a uniform pick
//! from the list is already frequency-weighted. Memory grows with the number
//! of observations rather than the number of distinct continuations, which
//! keeps sampling a single index lookup.

use nudge_core::{Bigram, SentimentBucket, Token};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

/// Bigram to continuation-list table for one sentiment bucket
#[derive(Debug, Clone, Default)]
pub struct BucketTable {
    continuations: HashMap<Bigram, Vec<Token>>,

    /// Second token -> bigrams ending in it, in first-observation order
    by_second: HashMap<Token, Vec<Bigram>>,

    observations: usize,
}

impl BucketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `next` followed `bigram`
    pub fn observe(&mut self, bigram: Bigram, next: Token) {
        self.observations += 1;

        if let Some(list) = self.continuations.get_mut(&bigram) {
            list.push(next);
            return;
        }

        self.by_second
            .entry(bigram.second.clone())
            .or_default()
            .push(bigram.clone());
        self.continuations.insert(bigram, vec![next]);
    }

    /// Continuations recorded for an exact bigram
    pub fn continuations(&self, bigram: &Bigram) -> Option<&[Token]> {
        self.continuations.get(bigram).map(Vec::as_slice)
    }

    /// Pool the continuation lists of every bigram whose second token is `last`.
    ///
    /// Lists are joined whole, in the order their bigrams were first seen,
    /// and accumulation stops as soon as the pool holds more than `cap` tokens.
    /// The pool borrows the lists rather than copying them.
    pub fn fallback_candidates(&self, last: &Token, cap: usize) -> FallbackPool<'_> {
        let mut pool = FallbackPool::default();
        let Some(bigrams) = self.by_second.get(last) else {
            return pool;
        };

        for bigram in bigrams {
            if let Some(list) = self.continuations.get(bigram) {
                pool.push(list);
                if pool.len() > cap {
                    break;
                }
            }
        }
        pool
    }

    /// Iterate over bigrams and their continuation lists
    pub fn iter(&self) -> impl Iterator<Item = (&Bigram, &[Token])> {
        self.continuations.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct bigram keys
    pub fn len(&self) -> usize {
        self.continuations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.continuations.is_empty()
    }

    /// Total continuations recorded across all keys
    pub fn observation_count(&self) -> usize {
        self.observations
    }
}

/// Continuation lists joined for a relaxed lookup
///
/// Behaves as the concatenation of its lists: `get(i)` indexes across list
/// boundaries, so a uniform index over `len()` is frequency-weighted exactly
/// as a pick from the flattened list would be.
#[derive(Debug, Clone, Default)]
pub struct FallbackPool<'a> {
    lists: Vec<&'a [Token]>,
    len: usize,
}

impl<'a> FallbackPool<'a> {
    fn push(&mut self, list: &'a [Token]) {
        self.len += list.len();
        self.lists.push(list);
    }

    /// Total tokens across all pooled lists
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Token at `index` of the concatenated lists
    pub fn get(&self, mut index: usize) -> Option<&'a Token> {
        for &list in &self.lists {
            if index < list.len() {
                return Some(&list[index]);
            }
            index -= list.len();
        }
        None
    }

    /// Uniform pick over every pooled token
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'a Token> {
        if self.is_empty() {
            return None;
        }
        self.get(rng.gen_range(0..self.len))
    }

    /// Iterate over the pooled tokens in order
    pub fn iter(&self) -> impl Iterator<Item = &'a Token> + '_ {
        self.lists.iter().flat_map(|&list| list.iter())
    }
}

/// The three bucket tables that make up a trained model
#[derive(Debug, Clone, Default)]
pub struct Model {
    tables: [BucketTable; 3],
}

impl Model {
    /// A model with all three buckets present and empty
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bucket(&self, bucket: SentimentBucket) -> &BucketTable {
        &self.tables[bucket.index()]
    }

    pub(crate) fn bucket_mut(&mut self, bucket: SentimentBucket) -> &mut BucketTable {
        &mut self.tables[bucket.index()]
    }

    /// True when no bucket has any bigram
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(BucketTable::is_empty)
    }

    /// Per-bucket size summary
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            buckets: SentimentBucket::ALL
                .iter()
                .map(|&bucket| {
                    let table = self.bucket(bucket);
                    BucketStats {
                        bucket,
                        bigrams: table.len(),
                        observations: table.observation_count(),
                    }
                })
                .collect(),
        }
    }
}

/// Summary of a model's size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub buckets: Vec<BucketStats>,
}

impl ModelStats {
    pub fn total_bigrams(&self) -> usize {
        self.buckets.iter().map(|b| b.bigrams).sum()
    }
}

/// Size of one bucket table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub bucket: SentimentBucket,
    pub bigrams: usize,
    pub observations: usize,
}
