//! Property-Based Tests for Cache Module
//!
//! Drives the cache with random operation sequences and compares it against
//! a plain `VecDeque` model of the recency order.

use proptest::prelude::*;
use std::collections::VecDeque;

use crate::cache::{BubbleCache, ManualClock, SharedBubbleCache};
use crate::error::CacheError;

// == Test Configuration ==
const TEST_TTL: u64 = 300;
const START: i64 = 1_700_000_000;

// == Strategies ==
/// Keys from a small alphabet so sequences revisit the same keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: String, value: i32 },
    Fetch { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<i32>())
            .prop_map(|(key, value)| CacheOp::Insert { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Fetch { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

// == Reference Model ==
/// Front is the most recently used entry.
#[derive(Debug, Default)]
struct Model {
    order: VecDeque<(String, i32)>,
    capacity: usize,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _)| k == key)
    }

    fn insert(&mut self, key: String, value: i32) -> Option<String> {
        let mut evicted = None;
        if let Some(pos) = self.position(&key) {
            self.order.remove(pos);
        } else if self.order.len() == self.capacity {
            evicted = self.order.pop_back().map(|(k, _)| k);
        }
        self.order.push_front((key, value));
        evicted
    }

    fn fetch(&mut self, key: &str) -> Option<i32> {
        let pos = self.position(key)?;
        let entry = self.order.remove(pos)?;
        let value = entry.1;
        self.order.push_front(entry);
        Some(value)
    }

    fn delete(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(pos) => self.order.remove(pos).is_some(),
            None => false,
        }
    }

    fn keys(&self) -> Vec<&str> {
        self.order.iter().map(|(k, _)| k.as_str()).collect()
    }

    fn values(&self) -> Vec<i32> {
        self.order.iter().map(|(_, v)| *v).collect()
    }
}

fn cache_keys<C: crate::cache::Clock>(cache: &BubbleCache<String, i32, C>) -> Vec<&str> {
    cache
        .list_records()
        .into_iter()
        .map(|record| record.key().as_str())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every operation keeps the chain well formed, bounded by capacity and
    // in the same recency order as the model.
    #[test]
    fn prop_matches_recency_model(
        capacity in 0usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut cache = BubbleCache::with_clock(capacity, TEST_TTL, ManualClock::new(START));
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                CacheOp::Insert { key, value } => {
                    let evicted = model.insert(key.clone(), value);
                    cache.insert(key.clone(), value).unwrap();

                    prop_assert_eq!(
                        cache.peek_top().map(|record| record.key().as_str()),
                        Some(key.as_str())
                    );
                    if let Some(evicted) = evicted {
                        prop_assert!(!cache.exists(&evicted));
                        prop_assert_eq!(
                            cache.fetch(&evicted),
                            Err(CacheError::NotFound(evicted.clone()))
                        );
                    }
                }
                CacheOp::Fetch { key } => {
                    match model.fetch(&key) {
                        Some(value) => {
                            prop_assert_eq!(cache.fetch(&key), Ok(value));
                            prop_assert_eq!(
                                cache.peek_top().map(|record| record.key().as_str()),
                                Some(key.as_str())
                            );
                        }
                        None => {
                            prop_assert_eq!(
                                cache.fetch(&key),
                                Err(CacheError::NotFound(key.clone()))
                            );
                        }
                    }
                }
                CacheOp::Delete { key } => {
                    let existed = model.delete(&key);
                    prop_assert_eq!(cache.delete(&key).is_ok(), existed);
                }
            }

            prop_assert!(cache.is_integral(), "chain broken");
            prop_assert!(cache.len() <= cache.capacity());
            prop_assert_eq!(cache.len(), model.order.len());
            prop_assert_eq!(cache_keys(&cache), model.keys());
            prop_assert_eq!(cache.list_values(), model.values());
        }

        cache.clear().unwrap();
        prop_assert!(cache.is_empty());
        prop_assert!(cache.is_integral());
    }

    // Re-inserting a present key changes its value and position only.
    #[test]
    fn prop_update_keeps_size(
        keys in prop::collection::hash_set(key_strategy(), 2..8),
        pick in any::<prop::sample::Index>(),
        new_value in any::<i32>()
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut cache = BubbleCache::with_clock(keys.len(), TEST_TTL, ManualClock::new(START));
        for (i, key) in keys.iter().enumerate() {
            cache.insert(key.clone(), i as i32).unwrap();
        }

        let chosen = pick.get(&keys).clone();
        cache.insert(chosen.clone(), new_value).unwrap();

        prop_assert_eq!(cache.len(), keys.len());
        prop_assert_eq!(cache.stats().evictions, 0);
        let top = cache.peek_top().unwrap();
        prop_assert_eq!(top.key(), &chosen);
        prop_assert_eq!(top.value(), Some(&new_value));
        prop_assert!(cache.is_integral());
    }

    // Promoting the bottom of a two-record chain is a plain swap, the same
    // result the general bottom-promotion path gives for longer chains.
    #[test]
    fn prop_two_record_promotion_is_swap(
        first in key_strategy(),
        second in key_strategy(),
        by_insert in any::<bool>()
    ) {
        prop_assume!(first != second);
        let mut cache = BubbleCache::with_clock(2, TEST_TTL, ManualClock::new(START));
        cache.insert(first.clone(), 1).unwrap();
        cache.insert(second.clone(), 2).unwrap();

        if by_insert {
            cache.insert(first.clone(), 10).unwrap();
        } else {
            prop_assert_eq!(cache.fetch(&first), Ok(1));
        }

        prop_assert_eq!(cache_keys(&cache), vec![first.as_str(), second.as_str()]);
        let bottom = cache.peek_bottom().unwrap();
        prop_assert!(bottom.upper.is_some() && bottom.lower.is_none());
        prop_assert!(cache.is_integral());
    }

    // Capacity enforcement for long insert-only runs.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 0usize..20,
        entries in prop::collection::vec((key_strategy(), any::<i32>()), 1..200)
    ) {
        let mut cache = BubbleCache::with_clock(capacity, TEST_TTL, ManualClock::new(START));

        for (key, value) in entries {
            cache.insert(key, value).unwrap();
            prop_assert!(cache.len() <= capacity.max(1));
            prop_assert_eq!(cache.list_records().len(), cache.len());
        }
    }
}

// TTL behaviour, driven by a manual clock instead of sleeping
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_ttl_expiration_behavior(
        ttl in 0u64..20,
        keys in prop::collection::hash_set(key_strategy(), 1..6),
        elapsed in 0i64..40
    ) {
        let clock = ManualClock::new(START);
        let mut cache = BubbleCache::with_clock(10, ttl, clock.clone());
        for key in &keys {
            cache.insert(key.clone(), 7).unwrap();
        }

        clock.advance(elapsed);
        let expired = elapsed >= ttl as i64;
        let mut expected_size = keys.len();

        for key in &keys {
            prop_assert_eq!(cache.is_live(key), Ok(!expired));
            if expired {
                prop_assert_eq!(cache.fetch(key), Err(CacheError::Expired(key.clone())));
                expected_size -= 1;
                prop_assert_eq!(cache.len(), expected_size);
                prop_assert_eq!(cache.fetch(key), Err(CacheError::NotFound(key.clone())));
            } else {
                prop_assert_eq!(cache.fetch(key), Ok(7));
            }
            prop_assert!(cache.is_integral());
        }
    }

    #[test]
    fn prop_purge_matches_per_record_liveness(
        ttl in 1u64..10,
        steps in prop::collection::vec((key_strategy(), 0i64..4), 1..30),
        tail in 0i64..12
    ) {
        let clock = ManualClock::new(START);
        let mut cache = BubbleCache::with_clock(8, ttl, clock.clone());
        for (key, advance) in steps {
            cache.insert(key, 0).unwrap();
            clock.advance(advance);
        }
        clock.advance(tail);

        let live_before: Vec<String> = cache
            .list_records()
            .into_iter()
            .filter(|record| cache.is_live(record.key()).unwrap_or(false))
            .map(|record| record.key().clone())
            .collect();
        let before = cache.len();

        let removed = cache.purge_expired();

        prop_assert_eq!(removed, before - live_before.len());
        let remaining: Vec<String> = cache.iter().map(|record| record.key().clone()).collect();
        prop_assert_eq!(remaining, live_before);
        prop_assert!(cache.is_integral());
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Tasks sharing one cache through the engine-wide lock never leave the
    // chain in a broken state.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..60)
    ) {
        let cache: SharedBubbleCache<String, i32> = SharedBubbleCache::new(8, TEST_TTL);

        tokio_test::block_on(async {
            let handles: Vec<_> = operations
                .into_iter()
                .map(|op| {
                    let cache = cache.clone();
                    tokio::spawn(async move {
                        match op {
                            CacheOp::Insert { key, value } => {
                                cache.insert(key, value).map(|_| ())
                            }
                            CacheOp::Fetch { key } => match cache.fetch(&key) {
                                Ok(_) | Err(CacheError::NotFound(_)) => Ok(()),
                                Err(err) => Err(err),
                            },
                            CacheOp::Delete { key } => match cache.delete(&key) {
                                Ok(()) | Err(CacheError::NotFound(_)) => Ok(()),
                                Err(err) => Err(err),
                            },
                        }
                    })
                })
                .collect();

            for handle in handles {
                let result = handle.await.expect("task should not panic");
                assert!(result.is_ok(), "operation failed: {:?}", result);
            }
        });

        prop_assert!(cache.is_integral());
        prop_assert!(cache.len() <= 8);
        prop_assert_eq!(cache.list_values().len(), cache.len());
    }
}

// == Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error turns into a JSON body with a string "error" field.
    #[test]
    fn prop_error_response_format(key in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::error::RecordError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let errors = vec![
            CacheError::InvalidRecord(RecordError::EmptyKey),
            CacheError::InvalidRecord(RecordError::EmptyValue),
            CacheError::InvalidRequest(key.clone()),
            CacheError::NotFound(key.clone()),
            CacheError::Expired(key.clone()),
            CacheError::EmptyCache,
            CacheError::IntegrityViolation,
        ];

        for error in errors {
            let expected = error.to_string();
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            prop_assert!(content_type.contains("application/json"));

            let bytes = tokio_test::block_on(to_bytes(response.into_body(), usize::MAX))
                .expect("body should be readable");
            let json: serde_json::Value =
                serde_json::from_slice(&bytes).expect("body should be JSON");
            prop_assert_eq!(json["error"].as_str(), Some(expected.as_str()));
        }
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_status_codes() {
        use crate::error::RecordError;

        let test_cases = vec![
            (
                CacheError::InvalidRecord(RecordError::EmptyKey),
                StatusCode::BAD_REQUEST,
            ),
            (
                CacheError::InvalidRequest("too long".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (CacheError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (CacheError::Expired("key".to_string()), StatusCode::NOT_FOUND),
            (CacheError::EmptyCache, StatusCode::CONFLICT),
            (
                CacheError::IntegrityViolation,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.into_response().status(), expected_status);
        }
    }

    #[test]
    fn test_model_eviction_order() {
        let mut model = Model::new(2);
        assert_eq!(model.insert("a".to_string(), 1), None);
        assert_eq!(model.insert("b".to_string(), 2), None);
        assert_eq!(model.fetch("a"), Some(1));
        assert_eq!(model.insert("c".to_string(), 3), Some("b".to_string()));
        assert_eq!(model.keys(), vec!["c", "a"]);
    }
}
