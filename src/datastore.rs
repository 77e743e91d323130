#[cfg(test)]
pub mod mock;
pub mod postgres;
pub mod structs;
pub mod tables;

use crate::datastore::structs::{NewPost, Post, User};
use crate::twoface::Fallible;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
/// The interface for storing posts and looking up users.
pub trait Client: Clone {
    /// Insert a new post. Its like and comment lists start empty.
    async fn new_post(&self, new_post: NewPost) -> Fallible<Post>;
    /// Every post, newest first.
    async fn list_posts(&self) -> Fallible<Vec<Post>>;
    async fn find_post(&self, post_id: Uuid) -> Fallible<Option<Post>>;
    /// Write back a post's mutable state (its like and comment lists).
    async fn save_post(&self, post: &Post) -> Fallible<()>;
    /// Hard-delete a post. Returns false if no such post existed.
    async fn delete_post(&self, post_id: Uuid) -> Fallible<bool>;
    /// Read-only user lookup. Never loads credentials.
    async fn get_user(&self, user_id: Uuid) -> Fallible<Option<User>>;
}
