//! Integration tests: Post API
//!
//! Exercises the full HTTP surface against a real MongoDB instance.
//!
//! Coverage:
//! - Create returns the persisted post with a store-assigned id
//! - Listing pagination, orderings, and the random-sampling response shape
//! - Atomic like increments, including the nonexistent-id success quirk
//! - Hard delete and repeated-delete confirmation
//! - Input validation rejections (no database required)
//!
//! The MongoDB-backed tests use testcontainers and need a local Docker
//! daemon; they are ignored by default and run with `cargo test -- --ignored`.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use mongodb::{Client, Database};
use post_service::handlers;
use serde_json::{json, Value};
use std::time::Duration;
use testcontainers::{core::WaitFor, runners::AsyncRunner, GenericImage};

/// Bootstrap a MongoDB instance with testcontainers
async fn setup_test_db() -> Result<Database, Box<dyn std::error::Error>> {
    let mongo_image = GenericImage::new("mongo", "7")
        .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"));

    let container = mongo_image.start().await?;
    let port = container.get_host_port_ipv4(27017).await?;

    let client = Client::with_uri_str(format!("mongodb://127.0.0.1:{}", port)).await?;
    let db = client.database("post_api_test");

    // Leak container to keep it alive for the duration of the test
    Box::leak(Box::new(container));

    Ok(db)
}

async fn init_app(
    db: &Database,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new().app_data(web::Data::new(db.clone())).service(
            web::scope("/api/posts")
                .service(
                    web::resource("")
                        .route(web::post().to(handlers::create_post))
                        .route(web::get().to(handlers::list_posts)),
                )
                .route("/{post_id}/like", web::put().to(handlers::like_post))
                .route("/{post_id}", web::delete().to(handlers::delete_post)),
        ),
    )
    .await
}

async fn create_post<S, B>(app: &S, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    test::read_body_json(resp).await
}

async fn list_posts<S, B>(app: &S, query: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts{}", query))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);
    test::read_body_json(resp).await
}

async fn like_post<S, B>(app: &S, id: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}/like", id))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);
    test::read_body_json(resp).await
}

#[actix_web::test]
#[ignore = "requires Docker"]
async fn create_assigns_id_and_defaults() {
    let db = setup_test_db().await.expect("mongo container");
    let app = init_app(&db).await;

    let created = create_post(&app, json!({ "title": "first post", "body": "hello" })).await;

    let id = created["_id"].as_str().expect("hex id");
    assert_eq!(id.len(), 24);
    assert_eq!(created["likes"], 0);
    assert_eq!(created["title"], "first post");
    assert!(created["createdAt"].as_str().is_some());

    let listing = list_posts(&app, "").await;
    assert_eq!(listing["totalPosts"], 1);
    assert_eq!(listing["posts"][0]["_id"], id);
}

#[actix_web::test]
#[ignore = "requires Docker"]
async fn listing_pagination_and_orderings() {
    let db = setup_test_db().await.expect("mongo container");
    let app = init_app(&db).await;

    for title in ["A", "B", "C"] {
        create_post(&app, json!({ "title": title })).await;
        // createdAt has millisecond resolution; keep the orderings strict
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let page = list_posts(&app, "?sort=recent&limit=2&page=1").await;
    assert_eq!(page["totalPosts"], 3);
    assert_eq!(page["currentPage"], 1);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["posts"][0]["title"], "C");
    assert_eq!(page["posts"][1]["title"], "B");

    let page = list_posts(&app, "?sort=recent&limit=2&page=2").await;
    assert_eq!(page["posts"][0]["title"], "A");
    assert_eq!(page["posts"].as_array().unwrap().len(), 1);

    let page = list_posts(&app, "?sort=oldest&limit=3").await;
    assert_eq!(page["posts"][0]["title"], "A");
    assert_eq!(page["posts"][2]["title"], "C");

    // An unrecognized sort value behaves like the default ordering
    let page = list_posts(&app, "?sort=newest&limit=1").await;
    assert_eq!(page["posts"][0]["title"], "C");

    let b_id = {
        let page = list_posts(&app, "?sort=oldest&limit=1&page=2").await;
        page["posts"][0]["_id"].as_str().unwrap().to_string()
    };
    like_post(&app, &b_id).await;
    like_post(&app, &b_id).await;

    let page = list_posts(&app, "?sort=popular&limit=1").await;
    assert_eq!(page["posts"][0]["title"], "B");
    assert_eq!(page["posts"][0]["likes"], 2);
}

#[actix_web::test]
#[ignore = "requires Docker"]
async fn random_listing_reports_only_returned_documents() {
    let db = setup_test_db().await.expect("mongo container");
    let app = init_app(&db).await;

    for title in ["A", "B", "C"] {
        create_post(&app, json!({ "title": title })).await;
    }

    let page = list_posts(&app, "?sort=random&limit=2").await;
    let returned = page["posts"].as_array().unwrap().len();
    assert!(returned >= 1 && returned <= 2);
    assert_eq!(page["totalPosts"], returned);
    assert_eq!(page["currentPage"], 1);
    assert!(page.get("totalPages").is_none());

    // Empty collection: sampled page is empty rather than an error
    let db = setup_test_db().await.expect("mongo container");
    let app = init_app(&db).await;
    let page = list_posts(&app, "?sort=random").await;
    assert_eq!(page["totalPosts"], 0);
    assert_eq!(page["posts"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
#[ignore = "requires Docker"]
async fn likes_increment_atomically() {
    let db = setup_test_db().await.expect("mongo container");
    let app = init_app(&db).await;

    let created = create_post(&app, json!({ "title": "likeable" })).await;
    let id = created["_id"].as_str().unwrap().to_string();

    let updated = like_post(&app, &id).await;
    assert_eq!(updated["likes"], 1);
    assert_eq!(updated["_id"], id.as_str());

    // Interleaved likes still land exactly once each
    let uri = format!("/api/posts/{}/like", id);
    let calls = (0..4).map(|_| {
        let req = test::TestRequest::put().uri(&uri).to_request();
        test::call_service(&app, req)
    });
    for resp in futures::future::join_all(calls).await {
        assert_eq!(resp.status(), 200);
    }

    let updated = like_post(&app, &id).await;
    assert_eq!(updated["likes"], 6);
}

#[actix_web::test]
#[ignore = "requires Docker"]
async fn liking_nonexistent_post_returns_null_success() {
    let db = setup_test_db().await.expect("mongo container");
    let app = init_app(&db).await;

    let body = like_post(&app, "507f1f77bcf86cd799439011").await;
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
#[ignore = "requires Docker"]
async fn delete_confirms_regardless_of_existence() {
    let db = setup_test_db().await.expect("mongo container");
    let app = init_app(&db).await;

    let created = create_post(&app, json!({ "title": "short-lived" })).await;
    let id = created["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post deleted");

    let listing = list_posts(&app, "").await;
    assert_eq!(listing["totalPosts"], 0);

    // A second delete of the same id is indistinguishable from the first
    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post deleted");
}

/// Validation failures are rejected before any store round trip, so these
/// run against a lazily connected client with no database behind it.
#[actix_web::test]
async fn invalid_input_is_rejected_without_store_access() {
    let client = Client::with_uri_str("mongodb://127.0.0.1:27017")
        .await
        .expect("lazy client");
    let db = client.database("post_api_validation");
    let app = init_app(&db).await;

    let req = test::TestRequest::get()
        .uri("/api/posts?page=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri("/api/posts?limit=-5")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri("/api/posts?page=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::put()
        .uri("/api/posts/not-an-id/like")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("not a valid post id"));

    let req = test::TestRequest::delete()
        .uri("/api/posts/not-an-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!([1, 2, 3]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
