/// Post handlers - HTTP endpoints for post operations
use crate::error::{AppError, Result};
use crate::models::{Post, SortOrder};
use crate::services::{PostPage, PostService};
use actix_web::{web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use mongodb::Database;
use serde::{Deserialize, Serialize};

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ListPostsQuery {
    /// Reject non-positive paging values before they reach the store.
    fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(AppError::ValidationError(format!(
                "page must be a positive integer, got {}",
                self.page
            )));
        }
        if self.limit < 1 {
            return Err(AppError::ValidationError(format!(
                "limit must be a positive integer, got {}",
                self.limit
            )));
        }
        Ok(())
    }
}

/// Page of posts with collection-wide totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageResponse {
    pub total_posts: u64,
    pub current_page: i64,
    pub total_pages: u64,
    pub posts: Vec<Post>,
}

/// Page of randomly sampled posts. Reports only the returned documents:
/// no `totalPages`, and `totalPosts` is the sampled count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampledPageResponse {
    pub current_page: i64,
    pub posts: Vec<Post>,
    pub total_posts: usize,
}

/// Create a new post from an arbitrary JSON object
pub async fn create_post(
    db: web::Data<Database>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse> {
    let fields = match body.into_inner() {
        serde_json::Value::Object(map) => mongodb::bson::to_document(&map)
            .map_err(|e| AppError::ValidationError(format!("invalid post body: {}", e)))?,
        _ => {
            return Err(AppError::ValidationError(
                "post body must be a JSON object".to_string(),
            ))
        }
    };

    let service = PostService::new(db.get_ref().clone());
    let post = service.create_post(fields).await?;

    Ok(HttpResponse::Created().json(post))
}

/// List posts with pagination and ordering
pub async fn list_posts(
    db: web::Data<Database>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    query.validate()?;

    let service = PostService::new(db.get_ref().clone());
    let page = service
        .list_posts(query.page, query.limit, query.sort)
        .await
        .map_err(|e| {
            tracing::error!("post listing failed: {}", e);
            e
        })?;

    let response = match page {
        PostPage::Ranked {
            posts,
            total_posts,
            total_pages,
        } => HttpResponse::Ok().json(PostPageResponse {
            total_posts,
            current_page: query.page,
            total_pages,
            posts,
        }),
        PostPage::Sampled { posts } => {
            let total_posts = posts.len();
            HttpResponse::Ok().json(SampledPageResponse {
                current_page: query.page,
                posts,
                total_posts,
            })
        }
    };

    Ok(response)
}

/// Increment a post's like counter
pub async fn like_post(db: web::Data<Database>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = parse_post_id(&path)?;

    let service = PostService::new(db.get_ref().clone());
    let post = service.like_post(id).await?;

    // A missing post serializes to `null` under a success status; this
    // endpoint never produces a distinct not-found response.
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post
pub async fn delete_post(db: web::Data<Database>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = parse_post_id(&path)?;

    let service = PostService::new(db.get_ref().clone());
    service.delete_post(id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Post deleted" })))
}

fn parse_post_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::ValidationError(format!("'{}' is not a valid post id", raw)))
}
