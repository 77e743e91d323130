use crate::datastore::{
    postgres::{errors::BlockingResp, PostgresStore},
    structs::{Comment, Like, NewPost, Post, User},
    tables::{posts, users},
    Client,
};
use crate::twoface::{Fallible, TfError};
use actix_web::web::block;
use async_trait::async_trait;
use chrono::{offset::Utc, DateTime};
use diesel::{
    query_dsl::{QueryDsl, RunQueryDsl},
    Connection, ExpressionMethods, OptionalExtension,
};
use uuid::Uuid;

/// How a post is laid out in the `posts` table. The like and comment lists are JSONB
/// document columns, so one row holds the whole post and a save is a single UPDATE.
#[derive(Queryable)]
struct PostRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    text: String,
    user_id: Uuid,
    name: String,
    avatar: String,
    likes: serde_json::Value,
    comments: serde_json::Value,
}

impl PostRow {
    fn into_post(self) -> Fallible<Post> {
        let likes: Vec<Like> = serde_json::from_value(self.likes)?;
        let comments: Vec<Comment> = serde_json::from_value(self.comments)?;
        Ok(Post {
            id: self.id,
            created_at: self.created_at,
            text: self.text,
            user_id: self.user_id,
            name: self.name,
            avatar: self.avatar,
            likes,
            comments,
        })
    }
}

#[async_trait]
impl Client for PostgresStore {
    async fn new_post(&self, new_post: NewPost) -> Fallible<Post> {
        let conn = self.pool.get()?;
        let post = block(move || {
            conn.transaction::<_, TfError, _>(|| {
                // Insert the new post
                let row: PostRow = diesel::insert_into(posts::table)
                    .values(&new_post)
                    .get_result(&conn)?;

                row.into_post()
            })
        })
        .await
        .to_resp()?;
        Ok(post)
    }

    async fn list_posts(&self) -> Fallible<Vec<Post>> {
        let conn = self.pool.get()?;
        let posts = block(move || -> Fallible<Vec<Post>> {
            let rows: Vec<PostRow> = posts::table
                .order_by(posts::created_at.desc())
                .get_results(&conn)?;

            rows.into_iter().map(PostRow::into_post).collect()
        })
        .await
        .to_resp()?;
        Ok(posts)
    }

    async fn find_post(&self, post_id: Uuid) -> Fallible<Option<Post>> {
        let conn = self.pool.get()?;
        let post = block(move || -> Fallible<Option<Post>> {
            let row: Option<PostRow> = posts::table.find(post_id).first(&conn).optional()?;

            guard!(let Some(row) = row else {
                return Ok(None);
            });

            row.into_post().map(Some)
        })
        .await
        .to_resp()?;
        Ok(post)
    }

    async fn save_post(&self, post: &Post) -> Fallible<()> {
        let conn = self.pool.get()?;
        let post_id = post.id;
        let likes = serde_json::to_value(&post.likes)?;
        let comments = serde_json::to_value(&post.comments)?;
        block(move || {
            conn.transaction::<_, TfError, _>(|| {
                diesel::update(posts::table.find(post_id))
                    .set((posts::likes.eq(likes), posts::comments.eq(comments)))
                    .execute(&conn)?;

                Ok(())
            })
        })
        .await
        .to_resp()?;
        Ok(())
    }

    async fn delete_post(&self, post_id: Uuid) -> Fallible<bool> {
        let conn = self.pool.get()?;
        let deleted = block(move || -> Fallible<bool> {
            let rows_deleted = diesel::delete(posts::table.find(post_id)).execute(&conn)?;

            Ok(rows_deleted > 0)
        })
        .await
        .to_resp()?;
        Ok(deleted)
    }

    async fn get_user(&self, user_id: Uuid) -> Fallible<Option<User>> {
        let conn = self.pool.get()?;
        let user = block(move || -> Fallible<Option<User>> {
            // The password_hash column is deliberately left out of the select.
            let user: Option<User> = users::table
                .find(user_id)
                .select((users::id, users::created_at, users::name, users::avatar))
                .first(&conn)
                .optional()?;

            Ok(user)
        })
        .await
        .to_resp()?;
        Ok(user)
    }
}
