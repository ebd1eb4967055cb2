//! # Event Delivery Accounting
//!
//! Mutations publish through the dispatcher into per-subscriber buffers. A
//! slow subscriber loses events once its buffer fills; every loss shows up
//! in the mutation's `PublishReport` and in that subscriber's drop counter,
//! and never affects the mutation itself or other subscribers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use proptest::prelude::*;
    use serde_json::json;
    use tokio::time::timeout;

    use ge_04_operation_dispatcher::{OperationDispatcher, OperationRequest, PublishStatus};
    use ge_05_recipes::InMemoryRecipeStore;
    use graph_runtime::RuntimeConfig;
    use shared_bus::DropReason;

    use crate::fixtures::engine_with;

    fn engine_with_capacity(capacity: usize) -> Arc<OperationDispatcher> {
        let mut config = RuntimeConfig::default();
        config.bus.channel_capacity = capacity;
        engine_with(&config, Arc::new(InMemoryRecipeStore::new())).0
    }

    fn add(title: &str) -> OperationRequest {
        OperationRequest::new("addRecipe").argument("newRecipeData", json!({ "title": title }))
    }

    #[tokio::test]
    async fn test_slow_subscriber_drops_are_reported() {
        let dispatcher = engine_with_capacity(2);
        let mut slow = dispatcher.subscribe(OperationRequest::new("recipeAdded")).await.unwrap();

        let mut reports = Vec::new();
        for i in 0..5 {
            let response = dispatcher.execute(add(&format!("Soup {i}"))).await.unwrap();
            match response.publish {
                Some(PublishStatus::Published(report)) => reports.push(report),
                other => panic!("expected published, got {other:?}"),
            }
        }

        assert!(reports.iter().all(|r| r.is_accounted()));
        assert!(reports[..2].iter().all(|r| !r.has_drops()));
        for report in &reports[2..] {
            assert_eq!(report.drops.len(), 1);
            assert_eq!(report.drops[0].subscriber, slow.id());
            assert_eq!(report.drops[0].reason, DropReason::BufferFull);
        }
        assert_eq!(slow.dropped(), 3);
        assert_eq!(dispatcher.metrics().publish_drops, 3);

        // The two buffered events are still delivered, in publish order.
        let first = timeout(Duration::from_secs(2), slow.next()).await.unwrap().unwrap().unwrap();
        let second = timeout(Duration::from_secs(2), slow.next()).await.unwrap().unwrap().unwrap();
        assert_eq!(first["title"], "Soup 0");
        assert_eq!(second["title"], "Soup 1");
        assert!(slow.try_next_event().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fast_subscriber_unaffected_by_slow_one() {
        let dispatcher = engine_with_capacity(1);
        let _slow = dispatcher.subscribe(OperationRequest::new("recipeAdded")).await.unwrap();
        let mut fast = dispatcher.subscribe(OperationRequest::new("recipeAdded")).await.unwrap();

        for i in 0..3 {
            let response = dispatcher.execute(add(&format!("Stew {i}"))).await.unwrap();
            let report = response.publish.as_ref().and_then(|p| p.report()).unwrap();
            assert_eq!(report.attempted, 2);
            assert!(report.is_accounted());

            let got = timeout(Duration::from_secs(2), fast.next()).await.unwrap().unwrap().unwrap();
            assert_eq!(got["title"], format!("Stew {i}"));
        }
        assert_eq!(fast.dropped(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Whatever the buffer size and mutation count, a never-draining
        /// subscriber keeps exactly `min(mutations, capacity)` events and has
        /// the rest counted as drops.
        #[test]
        fn prop_drops_plus_buffered_equals_published(
            capacity in 1usize..5,
            mutations in 0usize..10,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            rt.block_on(async {
                let dispatcher = engine_with_capacity(capacity);
                let mut live = dispatcher.subscribe(OperationRequest::new("recipeAdded")).await.unwrap();

                for i in 0..mutations {
                    let response = dispatcher.execute(add(&format!("r{i}"))).await.unwrap();
                    let report = response.publish.as_ref().and_then(|p| p.report()).unwrap();
                    prop_assert!(report.is_accounted());
                    prop_assert_eq!(report.attempted, 1);
                }

                let mut buffered = 0u64;
                while let Ok(Some(_)) = live.try_next_event() {
                    buffered += 1;
                }

                prop_assert_eq!(buffered, mutations.min(capacity) as u64);
                prop_assert_eq!(buffered + live.dropped(), mutations as u64);
                Ok(())
            })?;
        }
    }
}
