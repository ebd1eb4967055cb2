//! # Runtime Flows
//!
//! Environment → configuration → container → JSON-lines driver, exercised
//! the way the binary runs it.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::Value;
    use tokio::io::{duplex, AsyncReadExt, BufReader};

    use ge_04_operation_dispatcher::codes;
    use ge_05_recipes::InMemoryRecipeStore;
    use graph_runtime::{Driver, EngineContainer, RuntimeConfig};

    use crate::fixtures::cookbook;

    async fn serve(container: &EngineContainer, script: &str) -> Vec<Value> {
        let driver = Driver::new(Arc::clone(&container.dispatcher));
        let (writer, mut reader) = duplex(256 * 1024);
        let run = driver.run(BufReader::new(script.as_bytes()), writer, std::future::pending::<()>());
        tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();

        let mut raw = String::new();
        reader.read_to_string(&mut raw).await.unwrap();
        raw.lines().map(|l| serde_json::from_str(l).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_api_key_from_environment_protects_mutations() {
        let mut config = RuntimeConfig::load_with(|key| match key {
            "GE_API_KEY" => Some("k-123".to_string()),
            "GE_DEFAULT_RATING" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();
        config.dispatcher.mutation_tier = ge_01_guard_chain::OperationTier::Protected;

        let container = EngineContainer::with_store(
            &config,
            Arc::new(InMemoryRecipeStore::with_recipes(cookbook(1))),
        )
        .unwrap();

        let out = serve(
            &container,
            concat!(
                "{\"id\": 1, \"operation\": \"removeRecipe\", \"arguments\": {\"id\": \"1\"}}\n",
                "{\"id\": 2, \"operation\": \"removeRecipe\", \"arguments\": {\"id\": \"1\"}, \"caller\": {\"api_key\": \"k-123\"}}\n",
                "{\"id\": 3, \"operation\": \"recipe\", \"arguments\": {\"id\": \"1\"}, \"caller\": {\"subject\": \"ana\"}}\n",
                "{\"id\": 4, \"operation\": \"search\"}\n",
            ),
        )
        .await;

        assert_eq!(out.len(), 4);
        assert_eq!(out[0]["id"], 1);
        assert_eq!(out[0]["error"]["code"], codes::UNAUTHORIZED);
        assert_eq!(out[0]["error"]["data"]["guard"], "tier:protected");

        assert_eq!(out[1]["type"], "response");
        assert_eq!(out[1]["data"], true);

        assert_eq!(out[2]["error"]["code"], codes::RESOURCE_NOT_FOUND);
        assert_eq!(out[2]["error"]["data"]["id"], "1");

        assert_eq!(out[3]["data"][0]["rating"], 4);
    }

    #[tokio::test]
    async fn test_subscription_sees_only_later_mutations() {
        let container = EngineContainer::new(&RuntimeConfig::default()).unwrap();

        let out = serve(
            &container,
            concat!(
                "{\"operation\": \"addRecipe\", \"arguments\": {\"newRecipeData\": {\"title\": \"Before\"}}}\n",
                "{\"operation\": \"recipeAdded\"}\n",
                "{\"operation\": \"addRecipe\", \"arguments\": {\"newRecipeData\": {\"title\": \"After\"}}}\n",
            ),
        )
        .await;

        let events: Vec<_> = out.iter().filter(|v| v["type"] == "event").collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["data"]["title"], "After");
        assert_eq!(events[0]["data"]["id"], "2");
        assert_eq!(out.last().unwrap()["type"], "complete");
        assert!(container.bus.is_closed());
    }
}
