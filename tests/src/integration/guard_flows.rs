//! # Authorization Flows
//!
//! Guards run before any resolver and before any event is published. A
//! denial anywhere in the chain leaves the store and the bus untouched.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use ge_01_guard_chain::{Guard, GuardDecision, PredicateGuard};
    use ge_04_operation_dispatcher::{codes, DispatchError, OperationDispatcher, OperationRequest};
    use graph_runtime::RuntimeConfig;
    use shared_bus::EventPublisher;
    use shared_types::{CallerIdentity, OperationContext};

    use crate::fixtures::{engine, engine_with, SpyRecipeStore};

    /// Denies everything and counts how often it was asked.
    struct Tripwire {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Guard for Tripwire {
        fn name(&self) -> &str {
            "tripwire"
        }

        async fn check(&self, _ctx: &OperationContext) -> GuardDecision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            GuardDecision::deny("maintenance window")
        }
    }

    fn guarded(store: Arc<SpyRecipeStore>) -> (OperationDispatcher, Arc<AtomicUsize>) {
        let (dispatcher, _bus) = engine(store);
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = OperationDispatcher::new(
            Arc::clone(dispatcher.registry()),
            Arc::clone(dispatcher.bus()),
        )
        .with_global_guard(Tripwire {
            calls: Arc::clone(&calls),
        });
        (dispatcher, calls)
    }

    #[tokio::test]
    async fn test_first_guard_denial_never_reaches_store() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, calls) = guarded(store.clone());

        for request in [
            OperationRequest::new("recipe").caller(CallerIdentity::authenticated("ana")),
            OperationRequest::new("recipes"),
            OperationRequest::new("removeRecipe").argument("id", "9"),
            OperationRequest::new("addRecipe").argument("newRecipeData", json!({"title": "x"})),
        ] {
            let err = dispatcher.execute(request).await.unwrap_err();
            match err {
                DispatchError::AuthorizationDenied { guard, reason, .. } => {
                    assert_eq!(guard.as_deref(), Some("tripwire"));
                    assert_eq!(reason, "maintenance window");
                }
                other => panic!("expected denial, got {other:?}"),
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(store.call_count(), 0);
        assert_eq!(dispatcher.metrics().denied, 4);
        assert_eq!(dispatcher.metrics().resolver_invocations, 0);
    }

    #[tokio::test]
    async fn test_denied_mutation_publishes_nothing() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _calls) = guarded(store.clone());
        let mut watcher = {
            use shared_bus::EventSubscriber;
            dispatcher.bus().subscribe(&"recipeAdded".into()).unwrap()
        };

        let err = dispatcher
            .execute(OperationRequest::new("addRecipe").argument("newRecipeData", json!({"title": "x"})))
            .await
            .unwrap_err();

        assert_eq!(err.code(), codes::UNAUTHORIZED);
        assert!(watcher.try_recv().unwrap().is_none());
        assert_eq!(dispatcher.bus().events_published(), 0);
    }

    #[tokio::test]
    async fn test_denied_subscription_never_registers() {
        let (dispatcher, _calls) = guarded(Arc::new(SpyRecipeStore::new()));

        let err = dispatcher
            .subscribe(OperationRequest::new("recipeAdded"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), codes::UNAUTHORIZED);
        assert_eq!(dispatcher.bus().total_subscribers(), 0);
    }

    #[tokio::test]
    async fn test_recipe_requires_authenticated_caller() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _bus) = engine(store.clone());

        let err = dispatcher
            .execute(OperationRequest::new("recipe"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), codes::UNAUTHORIZED);
        assert_eq!(err.to_body().data, Some(json!({"guard": "authenticated"})));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_global_guard_runs_before_operation_guard() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, calls) = guarded(store.clone());

        // Anonymous caller would also fail `authenticated`; the global guard
        // answers first.
        let err = dispatcher.execute(OperationRequest::new("recipe")).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::AuthorizationDenied { ref guard, .. } if guard.as_deref() == Some("tripwire")
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_protected_mutation_tier_from_config() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [dispatcher]
            mutation_tier = "protected"
            api_key = "s3cret"
            "#,
        )
        .unwrap();
        let store = Arc::new(SpyRecipeStore::new().removing(true));
        let (dispatcher, _bus) = engine_with(&config, store.clone());
        let remove = || OperationRequest::new("removeRecipe").argument("id", "4");

        let err = dispatcher.execute(remove()).await.unwrap_err();
        assert_eq!(err.code(), codes::UNAUTHORIZED);
        assert_eq!(store.call_count(), 0);

        let wrong_key = remove().caller(CallerIdentity::anonymous().with_api_key("guess"));
        assert!(dispatcher.execute(wrong_key).await.is_err());
        assert_eq!(store.call_count(), 0);

        let keyed = remove().caller(CallerIdentity::anonymous().with_api_key("s3cret"));
        assert_eq!(dispatcher.execute(keyed).await.unwrap().data, json!(true));

        let local = remove().caller(CallerIdentity::anonymous().local());
        assert_eq!(dispatcher.execute(local).await.unwrap().data, json!(true));

        // Queries stay public.
        assert!(dispatcher.execute(OperationRequest::new("recipes")).await.is_ok());
    }

    #[tokio::test]
    async fn test_guards_run_before_argument_validation() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _bus) = engine(store.clone());

        let err = dispatcher
            .execute(OperationRequest::new("recipe").argument("bogus", 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::AuthorizationDenied { ref guard, .. } if guard.as_deref() == Some("authenticated")
        ));

        let err = dispatcher
            .execute(
                OperationRequest::new("recipe")
                    .argument("bogus", 1)
                    .caller(CallerIdentity::authenticated("ana")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), codes::INVALID_PARAMS);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_guards_see_arguments_as_sent() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let (dispatcher, _bus) = engine(Arc::new(SpyRecipeStore::new()));
        let dispatcher = OperationDispatcher::new(
            Arc::clone(dispatcher.registry()),
            Arc::clone(dispatcher.bus()),
        )
        .with_global_guard(PredicateGuard::new("record", "", move |ctx: &OperationContext| {
            record.lock().push(ctx.arguments.len());
            true
        }));

        dispatcher.execute(OperationRequest::new("recipes")).await.unwrap();
        dispatcher
            .execute(OperationRequest::new("recipes").argument("take", 5))
            .await
            .unwrap();

        assert_eq!(*seen.lock(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_predicate_guard_sees_arguments() {
        let store = Arc::new(SpyRecipeStore::new().removing(true));
        let (dispatcher, _bus) = engine(store.clone());
        let dispatcher = OperationDispatcher::new(
            Arc::clone(dispatcher.registry()),
            Arc::clone(dispatcher.bus()),
        )
        .with_global_guard(PredicateGuard::new(
            "no-removing-one",
            "recipe 1 is protected",
            |ctx: &OperationContext| ctx.argument_str("id") != Some("1") || ctx.operation != "removeRecipe",
        ));

        let err = dispatcher
            .execute(OperationRequest::new("removeRecipe").argument("id", "1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Operation 'removeRecipe' denied: recipe 1 is protected");

        let ok = dispatcher
            .execute(OperationRequest::new("removeRecipe").argument("id", "2"))
            .await
            .unwrap();
        assert_eq!(ok.data, json!(true));
    }
}
