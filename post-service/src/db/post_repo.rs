use crate::models::Post;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

/// Name of the MongoDB collection holding posts.
pub const COLLECTION: &str = "posts";

/// Insert a fully assembled post document.
pub async fn insert_document(
    collection: &Collection<Document>,
    document: &Document,
) -> Result<(), mongodb::error::Error> {
    collection.insert_one(document).await?;
    Ok(())
}

/// Fetch one page of posts under the given sort criteria.
pub async fn find_page(
    collection: &Collection<Post>,
    sort: Document,
    skip: u64,
    limit: i64,
) -> Result<Vec<Post>, mongodb::error::Error> {
    let cursor = collection
        .find(doc! {})
        .sort(sort)
        .skip(skip)
        .limit(limit)
        .await?;

    cursor.try_collect().await
}

/// Fetch one page of posts in the collection's natural order, used by
/// random sampling.
pub async fn find_sample(
    collection: &Collection<Post>,
    skip: u64,
    limit: i64,
) -> Result<Vec<Post>, mongodb::error::Error> {
    let cursor = collection.find(doc! {}).skip(skip).limit(limit).await?;

    cursor.try_collect().await
}

/// Count all posts in the collection.
pub async fn count_posts(collection: &Collection<Post>) -> Result<u64, mongodb::error::Error> {
    collection.count_documents(doc! {}).await
}

/// Atomically increment a post's like counter, returning the updated
/// document. Yields `None` when no post matches `id`.
pub async fn increment_likes(
    collection: &Collection<Post>,
    id: ObjectId,
) -> Result<Option<Post>, mongodb::error::Error> {
    collection
        .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "likes": 1 } })
        .return_document(ReturnDocument::After)
        .await
}

/// Hard-delete a post. Deleting a missing post is not an error; the count of
/// removed documents is returned.
pub async fn delete_post(
    collection: &Collection<Post>,
    id: ObjectId,
) -> Result<u64, mongodb::error::Error> {
    let result = collection.delete_one(doc! { "_id": id }).await?;
    Ok(result.deleted_count)
}
