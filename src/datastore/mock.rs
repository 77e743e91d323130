use crate::datastore::structs::{NewPost, Post, User};
use crate::twoface::Fallible;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::offset::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

type Store<T> = Arc<Mutex<Vec<T>>>;

/// A mock implementation of datastore::Client
#[derive(Clone, Default, Debug)]
pub struct Client {
    posts: Store<Post>,
    users: Store<User>,
}

impl Client {
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = Arc::new(Mutex::new(posts));
    }

    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = Arc::new(Mutex::new(users));
    }
}

#[async_trait]
impl super::Client for Client {
    async fn new_post(&self, new_post: NewPost) -> Fallible<Post> {
        // Insert the new post
        let post = Post {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            text: new_post.text,
            user_id: new_post.user_id,
            name: new_post.name,
            avatar: new_post.avatar,
            likes: Vec::new(),
            comments: Vec::new(),
        };
        self.posts.lock().unwrap().push(post.clone());

        Ok(post)
    }

    async fn list_posts(&self) -> Fallible<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_post(&self, post_id: Uuid) -> Fallible<Option<Post>> {
        let post = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == post_id)
            .cloned();
        Ok(post)
    }

    async fn save_post(&self, post: &Post) -> Fallible<()> {
        let mut posts = self.posts.lock().unwrap();
        guard!(let Some(slot) = posts.iter_mut().find(|p| p.id == post.id) else {
            return Err(anyhow!("post {} isn't in the store", post.id).into())
        });
        *slot = post.clone();
        Ok(())
    }

    async fn delete_post(&self, post_id: Uuid) -> Fallible<bool> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != post_id);
        Ok(posts.len() < before)
    }

    async fn get_user(&self, user_id: Uuid) -> Fallible<Option<User>> {
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned();
        Ok(user)
    }
}
