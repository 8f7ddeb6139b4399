/// End-to-end tests of the GraphQL API
///
/// Every scenario runs against both store backends, and the relation tests
/// also run with request-scoped batching switched on.

mod api_tests {
    use async_graphql::dynamic::Schema;
    use async_graphql::{Request, Response, Variables};
    use hackernews::schema::{self, AppContext, SchemaBuilder, INFO};
    use async_trait::async_trait;
    use hackernews::store::{
        Comment, Link, MemoryStore, NewComment, NewLink, SqliteStore, Store, StoreResult,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct TestApi {
        backend: &'static str,
        schema: Schema,
        app: AppContext,
    }

    impl TestApi {
        async fn request(&self, query: &str, variables: Value) -> Response {
            let request = Request::new(query).variables(Variables::from_json(variables));
            schema::execute(&self.schema, &self.app, request).await
        }

        /// Run a request that must succeed and return its data as JSON
        async fn data(&self, query: &str, variables: Value) -> Value {
            let response = self.request(query, variables).await;
            assert!(
                response.errors.is_empty(),
                "[{}] unexpected errors: {:?}",
                self.backend,
                response.errors
            );
            response.data.into_json().unwrap()
        }

        async fn post_link(&self, url: &str, description: &str) -> String {
            let data = self
                .data(
                    "mutation($url: String!, $description: String!) {
                        postLink(url: $url, description: $description) { id }
                    }",
                    json!({ "url": url, "description": description }),
                )
                .await;
            data["postLink"]["id"].as_str().unwrap().to_string()
        }

        async fn post_comment(&self, link_id: &str, body: &str) -> Response {
            self.request(
                "mutation($linkId: ID!, $body: String!) {
                    postCommentOnLink(linkId: $linkId, body: $body) { id body link { id } }
                }",
                json!({ "linkId": link_id, "body": body }),
            )
            .await
        }
    }

    async fn apis(batch_relations: bool) -> Vec<TestApi> {
        let _ = tracing_subscriber::fmt::try_init();

        let stores: Vec<(&'static str, Arc<dyn Store>)> = vec![
            ("memory", Arc::new(MemoryStore::new())),
            ("sqlite", Arc::new(SqliteStore::in_memory().await.unwrap())),
        ];

        stores
            .into_iter()
            .map(|(backend, store)| TestApi {
                backend,
                schema: SchemaBuilder::new().build_schema().unwrap(),
                app: AppContext::new(store).with_batch_relations(batch_relations),
            })
            .collect()
    }

    fn error_code(response: &Response) -> Option<String> {
        response.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(|code| match code {
                async_graphql::Value::String(s) => Some(s.clone()),
                _ => None,
            })
    }

    #[tokio::test]
    async fn test_info_is_constant() {
        for api in apis(false).await {
            let data = api.data("{ info }", json!({})).await;
            assert_eq!(data["info"], INFO);
        }
    }

    #[tokio::test]
    async fn test_post_link_echoes_input_with_fresh_ids() {
        for api in apis(false).await {
            let data = api
                .data(
                    r#"mutation {
                        postLink(url: "https://x", description: "d") { id url description createdAt }
                    }"#,
                    json!({}),
                )
                .await;
            let link = &data["postLink"];
            assert_eq!(link["url"], "https://x");
            assert_eq!(link["description"], "d");
            assert!(link["createdAt"].as_str().is_some());

            let first = link["id"].as_str().unwrap().to_string();
            let second = api.post_link("https://y", "e").await;
            assert_ne!(first, second, "[{}] ids must be distinct", api.backend);
        }
    }

    #[tokio::test]
    async fn test_feed_filtering_scenario() {
        for api in apis(false).await {
            let a = api.post_link("https://x", "d").await;
            api.post_link("https://rust-lang.org", "systems language").await;

            let all = api.data("{ feed { id } }", json!({})).await;
            assert_eq!(all["feed"].as_array().unwrap().len(), 2);

            let hits = api
                .data(r#"{ feed(filterNeedle: "x") { id url } }"#, json!({}))
                .await;
            let hits = hits["feed"].as_array().unwrap();
            assert_eq!(hits.len(), 1, "[{}] {:?}", api.backend, hits);
            assert_eq!(hits[0]["id"], a.as_str());

            let by_description = api
                .data(r#"{ feed(filterNeedle: "language") { url } }"#, json!({}))
                .await;
            assert_eq!(by_description["feed"][0]["url"], "https://rust-lang.org");

            let none = api
                .data(r#"{ feed(filterNeedle: "zzz") { id } }"#, json!({}))
                .await;
            assert!(none["feed"].as_array().unwrap().is_empty());

            let null_needle = api
                .data("query($n: String) { feed(filterNeedle: $n) { id } }", json!({ "n": null }))
                .await;
            assert_eq!(null_needle["feed"].as_array().unwrap().len(), 2);

            let comment = api.post_comment(&a, "first!").await;
            assert!(comment.errors.is_empty(), "[{}] {:?}", api.backend, comment.errors);
            let link = api
                .data(
                    "query($id: ID) { link(id: $id) { comments { body } } }",
                    json!({ "id": a }),
                )
                .await;
            assert_eq!(link["link"]["comments"].as_array().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_comment_on_missing_link_names_link_id() {
        for api in apis(false).await {
            let response = api.post_comment("4242", "nobody home").await;

            assert_eq!(response.errors.len(), 1);
            assert_eq!(
                response.errors[0].message,
                "Cannot post comment on non-existing link with id '4242'."
            );
            assert_eq!(error_code(&response).as_deref(), Some("BAD_USER_INPUT"));

            let data = api.data(r#"{ comment(id: "1") { id } }"#, json!({})).await;
            assert!(data["comment"].is_null(), "[{}] orphan comment was created", api.backend);
        }
    }

    #[tokio::test]
    async fn test_malformed_link_id_is_rejected() {
        for api in apis(false).await {
            api.post_link("https://x", "d").await;

            let response = api.post_comment("1abc", "typo").await;
            assert_eq!(response.errors[0].message, "Invalid ID '1abc'");
            assert_eq!(error_code(&response).as_deref(), Some("BAD_USER_INPUT"));

            let data = api.data("{ feed { comments { id } } }", json!({})).await;
            assert!(data["feed"][0]["comments"].as_array().unwrap().is_empty());

            let response = api.request(r#"{ link(id: "link-0") { id } }"#, json!({})).await;
            assert_eq!(response.errors[0].message, "Invalid ID 'link-0'");

            let response = api.request(r#"{ comment(id: "-1") { id } }"#, json!({})).await;
            assert_eq!(error_code(&response).as_deref(), Some("BAD_USER_INPUT"));
        }
    }

    #[tokio::test]
    async fn test_unknown_ids_resolve_to_null() {
        for api in apis(false).await {
            let data = api
                .data(r#"{ link(id: "999") { id } comment(id: "999") { id } }"#, json!({}))
                .await;
            assert!(data["link"].is_null());
            assert!(data["comment"].is_null());

            let data = api.data("{ link { id } }", json!({})).await;
            assert!(data["link"].is_null());
        }
    }

    #[tokio::test]
    async fn test_integer_id_literal_accepted() {
        for api in apis(false).await {
            let id = api.post_link("https://x", "d").await;
            let data = api
                .data(&format!("{{ link(id: {}) {{ url }} }}", id), json!({}))
                .await;
            assert_eq!(data["link"]["url"], "https://x");
        }
    }

    async fn check_relations_round_trip(batch_relations: bool) {
        for api in apis(batch_relations).await {
            let a = api.post_link("https://a", "first").await;
            let b = api.post_link("https://b", "second").await;

            let response = api.post_comment(&a, "nice").await;
            assert!(response.errors.is_empty(), "{:?}", response.errors);
            let created = response.data.into_json().unwrap();
            let comment_id = created["postCommentOnLink"]["id"].as_str().unwrap().to_string();
            assert_eq!(created["postCommentOnLink"]["link"]["id"], a.as_str());

            let data = api
                .data(
                    "query($id: ID!) { comment(id: $id) { body link { id url comments { id } } } }",
                    json!({ "id": comment_id }),
                )
                .await;
            let comment = &data["comment"];
            assert_eq!(comment["body"], "nice");
            assert_eq!(comment["link"]["id"], a.as_str());
            assert_eq!(comment["link"]["url"], "https://a");

            let ids: Vec<&str> = comment["link"]["comments"]
                .as_array()
                .unwrap()
                .iter()
                .map(|c| c["id"].as_str().unwrap())
                .collect();
            assert_eq!(ids, vec![comment_id.as_str()]);

            let feed = api
                .data("{ feed { id comments { body link { id } } } }", json!({}))
                .await;
            let feed = feed["feed"].as_array().unwrap();
            assert_eq!(feed.len(), 2);
            assert_eq!(feed[0]["comments"].as_array().unwrap().len(), 1);
            assert_eq!(feed[0]["comments"][0]["link"]["id"], a.as_str());
            assert_eq!(feed[1]["id"], b.as_str());
            assert!(feed[1]["comments"].as_array().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_relations_round_trip() {
        check_relations_round_trip(false).await;
    }

    #[tokio::test]
    async fn test_relations_round_trip_batched() {
        check_relations_round_trip(true).await;
    }

    #[tokio::test]
    async fn test_batched_and_simple_modes_agree() {
        let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().await.unwrap());
        let schema = SchemaBuilder::new().build_schema().unwrap();
        let simple = AppContext::new(store.clone());
        let batched = AppContext::new(store).with_batch_relations(true);

        for (url, description) in [("https://a", "a"), ("https://b", "b"), ("https://c", "c")] {
            let response = schema::execute(
                &schema,
                &simple,
                format!(
                    r#"mutation {{ postLink(url: "{}", description: "{}") {{ id }} }}"#,
                    url, description
                ),
            )
            .await;
            assert!(response.errors.is_empty());
        }
        for (link_id, body) in [("1", "x"), ("1", "y"), ("3", "z")] {
            let response = schema::execute(
                &schema,
                &simple,
                format!(
                    r#"mutation {{ postCommentOnLink(linkId: "{}", body: "{}") {{ id }} }}"#,
                    link_id, body
                ),
            )
            .await;
            assert!(response.errors.is_empty());
        }

        let query = "{ feed { id url comments { id body link { id description } } } }";
        let from_simple = schema::execute(&schema, &simple, query).await;
        let from_batched = schema::execute(&schema, &batched, query).await;

        assert!(from_simple.errors.is_empty());
        assert!(from_batched.errors.is_empty());
        assert_eq!(
            from_simple.data.into_json().unwrap(),
            from_batched.data.into_json().unwrap()
        );
    }

    /// Counts relation lookups made one parent at a time versus in batches
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        single: AtomicUsize,
        batch: AtomicUsize,
    }

    impl CountingStore {
        fn reset(&self) {
            self.single.store(0, Ordering::SeqCst);
            self.batch.store(0, Ordering::SeqCst);
        }

        fn counts(&self) -> (usize, usize) {
            (self.single.load(Ordering::SeqCst), self.batch.load(Ordering::SeqCst))
        }
    }

    #[async_trait]
    impl Store for CountingStore {
        async fn find_links(&self, filter: Option<&str>) -> StoreResult<Vec<Link>> {
            self.inner.find_links(filter).await
        }

        async fn find_link(&self, id: i64) -> StoreResult<Option<Link>> {
            self.single.fetch_add(1, Ordering::SeqCst);
            self.inner.find_link(id).await
        }

        async fn find_links_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Link>> {
            self.batch.fetch_add(1, Ordering::SeqCst);
            self.inner.find_links_by_ids(ids).await
        }

        async fn create_link(&self, new_link: NewLink) -> StoreResult<Link> {
            self.inner.create_link(new_link).await
        }

        async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>> {
            self.inner.find_comment(id).await
        }

        async fn find_comments_by_link(&self, link_id: i64) -> StoreResult<Vec<Comment>> {
            self.single.fetch_add(1, Ordering::SeqCst);
            self.inner.find_comments_by_link(link_id).await
        }

        async fn find_comments_by_links(&self, link_ids: &[i64]) -> StoreResult<Vec<Comment>> {
            self.batch.fetch_add(1, Ordering::SeqCst);
            self.inner.find_comments_by_links(link_ids).await
        }

        async fn create_comment(&self, new_comment: NewComment) -> StoreResult<Comment> {
            self.inner.create_comment(new_comment).await
        }
    }

    #[tokio::test]
    async fn test_batching_merges_sibling_relation_fetches() {
        let store = Arc::new(CountingStore::default());
        for i in 0..5 {
            let link = store
                .create_link(NewLink {
                    url: format!("https://example.com/{}", i),
                    description: format!("link {}", i),
                })
                .await
                .unwrap();
            store
                .create_comment(NewComment {
                    body: format!("comment {}", i),
                    link_id: Some(link.id),
                })
                .await
                .unwrap();
        }

        let schema = SchemaBuilder::new().build_schema().unwrap();
        let shared: Arc<dyn Store> = store.clone();
        let query = "{ feed { comments { link { id } } } }";

        store.reset();
        let simple = AppContext::new(shared.clone());
        let response = schema::execute(&schema, &simple, query).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(store.counts(), (10, 0));

        store.reset();
        let batched = AppContext::new(shared).with_batch_relations(true);
        let response = schema::execute(&schema, &batched, query).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(store.counts(), (0, 2));
    }
}
