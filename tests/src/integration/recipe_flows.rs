//! # Recipe Surface Flows
//!
//! End-to-end behavior of the recipe operations through the wired engine:
//!
//! 1. **Query → store → composer**: `recipe`, `recipes`, `search`
//! 2. **Mutation → store → bus → live subscription**: `addRecipe`
//! 3. **Mutation without event**: `removeRecipe`
//!
//! The store is a spy so every collaborator call is visible.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use serde_json::json;

    use ge_04_operation_dispatcher::{codes, DispatchError, OperationRequest};
    use ge_05_recipes::{InMemoryRecipeStore, NewRecipeInput, RecipesArgs};
    use shared_types::CallerIdentity;

    use crate::fixtures::{cookbook, engine, recipe, SpyRecipeStore, StoreCall, UnavailableStore};

    const WAIT: Duration = Duration::from_secs(2);

    fn ana() -> CallerIdentity {
        CallerIdentity::authenticated("ana")
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[tokio::test]
    async fn test_recipe_missing_is_not_found_with_id() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _bus) = engine(store.clone());

        let err = dispatcher
            .execute(
                OperationRequest::new("recipe")
                    .argument("id", "1")
                    .caller(ana()),
            )
            .await
            .unwrap_err();

        assert!(matches!(&err, DispatchError::NotFound(id) if id == "1"));
        assert_eq!(err.code(), codes::RESOURCE_NOT_FOUND);
        assert_eq!(store.calls(), vec![StoreCall::FindOne("1".into())]);
    }

    #[tokio::test]
    async fn test_recipe_defaults_id_and_composes() {
        let store = Arc::new(SpyRecipeStore::new().finding(recipe("1", "Pancakes", &["flour", "egg"])));
        let (dispatcher, _bus) = engine(store.clone());

        let response = dispatcher
            .execute(OperationRequest::new("recipe").caller(ana()))
            .await
            .unwrap();

        assert_eq!(store.calls(), vec![StoreCall::FindOne("1".into())]);
        assert_eq!(response.data["__typename"], "Recipe");
        assert_eq!(response.data["title"], "Pancakes");
        assert_eq!(response.data["rating"], 10);
        assert_eq!(
            response.data["ingredients"],
            json!([
                {"__typename": "Ingredient", "name": "flour"},
                {"__typename": "Ingredient", "name": "egg"}
            ])
        );
        assert!(response.publish.is_none());
    }

    #[tokio::test]
    async fn test_recipes_passes_pagination_to_store() {
        let store = Arc::new(SpyRecipeStore::new().listing(cookbook(3)));
        let (dispatcher, _bus) = engine(store.clone());

        let response = dispatcher
            .execute(OperationRequest::new("recipes").argument("skip", 2).argument("take", 3))
            .await
            .unwrap();

        assert_eq!(
            store.calls(),
            vec![StoreCall::FindAll(RecipesArgs { skip: 2, take: 3 })]
        );
        let titles: Vec<_> = response.data.as_array().unwrap().iter().map(|r| r["title"].clone()).collect();
        assert_eq!(titles, vec![json!("Recipe 1"), json!("Recipe 2"), json!("Recipe 3")]);
    }

    #[tokio::test]
    async fn test_recipes_take_out_of_range() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _bus) = engine(store.clone());

        let err = dispatcher
            .execute(OperationRequest::new("recipes").argument("take", 51))
            .await
            .unwrap_err();

        assert_eq!(err.code(), codes::INVALID_PARAMS);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recipes_paginates_in_memory_store() {
        let (dispatcher, _bus) = engine(Arc::new(InMemoryRecipeStore::with_recipes(cookbook(30))));

        let first = dispatcher.execute(OperationRequest::new("recipes")).await.unwrap();
        assert_eq!(first.data.as_array().unwrap().len(), 25);

        let rest = dispatcher
            .execute(OperationRequest::new("recipes").argument("skip", 25))
            .await
            .unwrap();
        let rest = rest.data.as_array().unwrap();
        assert_eq!(rest.len(), 5);
        assert_eq!(rest[0]["id"], "26");
    }

    #[tokio::test]
    async fn test_search_tags_each_member() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _bus) = engine(store.clone());

        let response = dispatcher.execute(OperationRequest::new("search")).await.unwrap();
        let items = response.data.as_array().unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["__typename"], "Recipe");
        assert_eq!(items[0]["title"], "recipe");
        assert_eq!(items[0]["ingredients"], json!([]));
        assert_eq!(items[1]["__typename"], "Ingredient");
        assert_eq!(items[1]["name"], "test");
        assert!(items[1].get("ingredients").is_none());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates_unchanged() {
        let (dispatcher, _bus) = engine(Arc::new(UnavailableStore));

        let err = dispatcher.execute(OperationRequest::new("recipes")).await.unwrap_err();

        assert_eq!(err.code(), codes::EXECUTION_ERROR);
        assert!(err.to_string().contains("store offline"));
    }

    // =========================================================================
    // MUTATIONS AND LIVE SUBSCRIPTIONS
    // =========================================================================

    #[tokio::test]
    async fn test_add_recipe_reaches_live_subscriber() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _bus) = engine(store.clone());
        let mut live = dispatcher
            .subscribe(OperationRequest::new("recipeAdded"))
            .await
            .unwrap();

        let response = dispatcher
            .execute(
                OperationRequest::new("addRecipe")
                    .argument("newRecipeData", json!({"title": "Tomato Soup"})),
            )
            .await
            .unwrap();

        assert_eq!(
            store.calls(),
            vec![StoreCall::Create(NewRecipeInput::new("Tomato Soup"))]
        );
        assert_eq!(response.data["title"], "Tomato Soup");
        let report = response.publish.as_ref().and_then(|p| p.report()).unwrap();
        assert_eq!(report.topic.as_str(), "recipeAdded");
        assert_eq!(report.attempted, 1);
        assert_eq!(report.delivered, 1);

        let pushed = timeout(WAIT, live.next()).await.unwrap().unwrap().unwrap();
        assert_eq!(pushed["__typename"], "Recipe");
        assert_eq!(pushed["id"], "100");
        assert_eq!(pushed["title"], "Tomato Soup");
        assert_eq!(pushed, response.data);
    }

    #[tokio::test]
    async fn test_every_live_subscriber_receives_the_event() {
        let (dispatcher, bus) = engine(Arc::new(InMemoryRecipeStore::new()));
        let mut a = dispatcher.subscribe(OperationRequest::new("recipeAdded")).await.unwrap();
        let mut b = dispatcher.subscribe(OperationRequest::new("recipeAdded")).await.unwrap();
        assert_eq!(bus.total_subscribers(), 2);

        dispatcher
            .execute(
                OperationRequest::new("addRecipe")
                    .argument("newRecipeData", json!({"title": "Bread", "ingredients": ["flour"]})),
            )
            .await
            .unwrap();

        for live in [&mut a, &mut b] {
            let pushed = timeout(WAIT, live.next()).await.unwrap().unwrap().unwrap();
            assert_eq!(pushed["title"], "Bread");
            assert_eq!(pushed["ingredients"][0]["name"], "flour");
        }
    }

    #[tokio::test]
    async fn test_cancelled_subscriber_gets_nothing() {
        let (dispatcher, bus) = engine(Arc::new(InMemoryRecipeStore::new()));
        let mut live = dispatcher.subscribe(OperationRequest::new("recipeAdded")).await.unwrap();
        live.cancel();
        assert_eq!(bus.total_subscribers(), 0);

        let response = dispatcher
            .execute(
                OperationRequest::new("addRecipe")
                    .argument("newRecipeData", json!({"title": "Bread"})),
            )
            .await
            .unwrap();

        assert_eq!(response.publish.as_ref().and_then(|p| p.report()).unwrap().attempted, 0);
        assert!(timeout(WAIT, live.next()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_recipe_false_publishes_nothing() {
        let store = Arc::new(SpyRecipeStore::new().removing(false));
        let (dispatcher, _bus) = engine(store.clone());
        let mut live = dispatcher
            .subscribe(OperationRequest::new("recipeAdded"))
            .await
            .unwrap();

        let response = dispatcher
            .execute(OperationRequest::new("removeRecipe").argument("id", "9"))
            .await
            .unwrap();

        assert_eq!(response.data, json!(false));
        assert!(response.publish.is_none());
        assert_eq!(store.calls(), vec![StoreCall::Remove("9".into())]);
        assert!(live.try_next_event().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_recipe_rejects_missing_payload() {
        let store = Arc::new(SpyRecipeStore::new());
        let (dispatcher, _bus) = engine(store.clone());

        let err = dispatcher
            .execute(OperationRequest::new("addRecipe"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), codes::INVALID_PARAMS);
        assert_eq!(store.call_count(), 0);
    }
}
