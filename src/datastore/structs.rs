use crate::datastore::tables::posts;
use chrono::{offset::Utc, DateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user of the site. Credentials live in a separate column of the users table and are
/// never loaded by this crate.
#[derive(Queryable, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub avatar: String,
}

/// One user's endorsement of a post. The like list is ordered newest-first.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Like {
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A reply on a post. Carries a snapshot of its author's name and avatar, and is only
/// deletable by that author.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// A post with its embedded like and comment lists. `name` and `avatar` snapshot the
/// author's values at creation time, so reads never need a second lookup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub user_id: Uuid,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}

/// Parameters for the database statement which inserts new posts. The id, timestamp and
/// empty like/comment lists come from column defaults.
#[derive(Insertable, Debug)]
#[table_name = "posts"]
pub struct NewPost {
    pub text: String,
    pub user_id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// Outcome of trying to delete one comment from a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentDeletion {
    Deleted,
    NoSuchComment,
    NotTheAuthor,
}

impl Post {
    /// Has this user already liked the post?
    pub fn liked_by(&self, user_id: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user_id)
    }

    /// Record a like at the front of the list. Returns false (and changes nothing) if
    /// `user_id` already liked this post.
    pub fn like(&mut self, user_id: Uuid) -> bool {
        if self.liked_by(user_id) {
            return false;
        }
        self.likes.insert(
            0,
            Like {
                user: user_id,
                created_at: Utc::now(),
            },
        );
        true
    }

    /// Withdraw a like, keeping the rest of the list in order. Returns false if `user_id`
    /// never liked this post.
    pub fn unlike(&mut self, user_id: Uuid) -> bool {
        guard!(let Some(i) = self.likes.iter().position(|like| like.user == user_id) else {
            return false
        });
        self.likes.remove(i);
        true
    }

    /// Attach a new comment at the front of the list, snapshotting the author's current
    /// name and avatar.
    pub fn add_comment(&mut self, text: String, author: &User) {
        self.comments.insert(
            0,
            Comment {
                id: Uuid::new_v4(),
                user: author.id,
                text,
                name: author.name.clone(),
                avatar: author.avatar.clone(),
                created_at: Utc::now(),
            },
        );
    }

    /// Delete the comment with the given id. Comments are matched by their own id, never
    /// by author, so two comments by the same user stay independent.
    pub fn delete_comment(&mut self, comment_id: Uuid, user_id: Uuid) -> CommentDeletion {
        guard!(let Some(i) = self.comments.iter().position(|c| c.id == comment_id) else {
            return CommentDeletion::NoSuchComment
        });
        if self.comments[i].user != user_id {
            return CommentDeletion::NotTheAuthor;
        }
        self.comments.remove(i);
        CommentDeletion::Deleted
    }
}
