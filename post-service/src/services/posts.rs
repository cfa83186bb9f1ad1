/// Post service - handles post creation, listing, likes, and deletion
use crate::db::post_repo;
use crate::error::Result;
use crate::models::{Post, SortOrder};
use mongodb::bson::{oid::ObjectId, DateTime, Document};
use mongodb::{Collection, Database};
use rand::Rng;

/// One page of posts produced by the listing operation.
///
/// Ranked pages report collection-wide totals. Sampled (random) pages only
/// know about the documents they returned and carry no page count.
#[derive(Debug)]
pub enum PostPage {
    Ranked {
        posts: Vec<Post>,
        total_posts: u64,
        total_pages: u64,
    },
    Sampled {
        posts: Vec<Post>,
    },
}

pub struct PostService {
    db: Database,
}

impl PostService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn posts(&self) -> Collection<Post> {
        self.db.collection(post_repo::COLLECTION)
    }

    fn documents(&self) -> Collection<Document> {
        self.db.collection(post_repo::COLLECTION)
    }

    /// Create a new post from caller-supplied fields.
    ///
    /// `_id` and `createdAt` are store-owned, so caller-supplied values for
    /// them are replaced. `likes` starts at 0 unless the caller provided one.
    pub async fn create_post(&self, mut fields: Document) -> Result<Post> {
        fields.insert("_id", ObjectId::new());
        fields.insert("createdAt", DateTime::now());
        if !fields.contains_key("likes") {
            fields.insert("likes", 0_i64);
        }

        post_repo::insert_document(&self.documents(), &fields).await?;

        let post = mongodb::bson::from_document(fields)?;
        Ok(post)
    }

    /// List posts for the requested page, page size, and ordering.
    ///
    /// Callers are expected to have validated `page` and `limit` as positive.
    pub async fn list_posts(&self, page: i64, limit: i64, sort: SortOrder) -> Result<PostPage> {
        let collection = self.posts();

        match sort.sort_doc() {
            Some(order) => {
                let skip = ((page - 1) * limit) as u64;
                let posts = post_repo::find_page(&collection, order, skip, limit).await?;
                let total_posts = post_repo::count_posts(&collection).await?;

                Ok(PostPage::Ranked {
                    posts,
                    total_posts,
                    total_pages: total_pages(total_posts, limit as u64),
                })
            }
            None => {
                let total = post_repo::count_posts(&collection).await?;
                let posts = if total == 0 {
                    Vec::new()
                } else {
                    let skip = rand::thread_rng().gen_range(0..total);
                    post_repo::find_sample(&collection, skip, limit).await?
                };

                Ok(PostPage::Sampled { posts })
            }
        }
    }

    /// Increment a post's like counter by one, returning the updated post.
    /// Returns `None` when no post matches `id`.
    pub async fn like_post(&self, id: ObjectId) -> Result<Option<Post>> {
        let post = post_repo::increment_likes(&self.posts(), id).await?;
        Ok(post)
    }

    /// Permanently delete a post. Deleting a missing post succeeds the same
    /// way deleting an existing one does.
    pub async fn delete_post(&self, id: ObjectId) -> Result<()> {
        post_repo::delete_post(&self.posts(), id).await?;
        Ok(())
    }
}

/// Number of pages needed to cover `total` documents at `limit` per page.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit)
}
