//! Handlers for the posts resource: create/list/get/delete a post, like/unlike it, and
//! add or delete comments. Every route requires a bearer token (the [`Identity`]
//! extractor), and post ids are parsed here so a malformed id reads as "no such post"
//! rather than a parse fault.
use crate::api::{observe, State};
use crate::auth::Identity;
use crate::datastore::structs::{Comment, CommentDeletion, Like, NewPost, Post, User};
use crate::datastore::Client;
use crate::twoface::{Cause, Describe, DescribeErr, ExternalError, Fallible, FieldError};
use actix_web::web;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub fn configure<DS: Client + 'static>(cfg: &mut web::ServiceConfig) {
    // The like/unlike/comment resources are registered before "/{id}" so their path
    // segments aren't swallowed by the id match.
    cfg.service(
        web::resource("")
            .route(web::post().to(create_post::<DS>))
            .route(web::get().to(list_posts::<DS>)),
    )
    .service(web::resource("/like/{id}").route(web::put().to(like_post::<DS>)))
    .service(web::resource("/unlike/{id}").route(web::put().to(unlike_post::<DS>)))
    .service(web::resource("/comment/{id}").route(web::post().to(add_comment::<DS>)))
    .service(web::resource("/comment/{id}/{comment_id}").route(web::delete().to(delete_comment::<DS>)))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_post::<DS>))
            .route(web::delete().to(delete_post::<DS>)),
    );
}

/// Request body for creating a post or a comment.
#[derive(Serialize, Deserialize, Validate)]
pub struct TextBody {
    #[validate(length(min = 1, message = "Text is required"))]
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct Confirmation {
    pub msg: &'static str,
}

// Insert a post into the datastore, stamped with a snapshot of its author.
async fn create_post<DS: Client>(
    state: web::Data<State<DS>>,
    identity: Identity,
    body: web::Json<TextBody>,
) -> Fallible<web::Json<Post>> {
    observe("create_post", || async {
        check_valid(&*body)?;
        let author = load_author(&*state.ds, identity).await?;
        let new_post = NewPost {
            text: body.text.clone(),
            user_id: author.id,
            name: author.name,
            avatar: author.avatar,
        };
        let post = state.ds.new_post(new_post).await?;
        Ok(web::Json(post))
    })
    .await
}

// Get every post, newest first.
async fn list_posts<DS: Client>(
    state: web::Data<State<DS>>,
    _identity: Identity,
) -> Fallible<web::Json<Vec<Post>>> {
    observe("list_posts", || async {
        let posts = state.ds.list_posts().await?;
        Ok(web::Json(posts))
    })
    .await
}

async fn get_post<DS: Client>(
    state: web::Data<State<DS>>,
    _identity: Identity,
    path: web::Path<String>,
) -> Fallible<web::Json<Post>> {
    observe("get_post", || async {
        let post_id = parse_post_id(&path)?;
        let post = find_post(&*state.ds, post_id).await?;
        Ok(web::Json(post))
    })
    .await
}

// Delete a post. Only its author may do this.
async fn delete_post<DS: Client>(
    state: web::Data<State<DS>>,
    identity: Identity,
    path: web::Path<String>,
) -> Fallible<web::Json<Confirmation>> {
    observe("delete_post", || async {
        let post_id = parse_post_id(&path)?;
        let post = find_post(&*state.ds, post_id).await?;

        // Check user
        if post.user_id != identity.user_id {
            return Err(anyhow!(
                "user {} tried to delete post {} owned by {}",
                identity.user_id,
                post_id,
                post.user_id
            )
            .describe(not_authorized()));
        }

        state.ds.delete_post(post_id).await?;
        Ok(web::Json(Confirmation {
            msg: "Post removed",
        }))
    })
    .await
}

// Like a post. Each user may like a given post at most once.
async fn like_post<DS: Client>(
    state: web::Data<State<DS>>,
    identity: Identity,
    path: web::Path<String>,
) -> Fallible<web::Json<Vec<Like>>> {
    observe("like_post", || async {
        let post_id = parse_post_id(&path)?;
        let mut post = find_post(&*state.ds, post_id).await?;

        if !post.like(identity.user_id) {
            return Err(
                anyhow!("user {} already liked post {}", identity.user_id, post_id).describe(
                    ExternalError::new(Cause::UserActionInvalid, "Post already liked"),
                ),
            );
        }

        state.ds.save_post(&post).await?;
        Ok(web::Json(post.likes))
    })
    .await
}

// Withdraw a like from a post.
async fn unlike_post<DS: Client>(
    state: web::Data<State<DS>>,
    identity: Identity,
    path: web::Path<String>,
) -> Fallible<web::Json<Vec<Like>>> {
    observe("unlike_post", || async {
        let post_id = parse_post_id(&path)?;
        let mut post = find_post(&*state.ds, post_id).await?;

        if !post.unlike(identity.user_id) {
            return Err(
                anyhow!("user {} hasn't liked post {}", identity.user_id, post_id).describe(
                    ExternalError::new(Cause::UserActionInvalid, "Post has not yet been liked"),
                ),
            );
        }

        state.ds.save_post(&post).await?;
        Ok(web::Json(post.likes))
    })
    .await
}

// Comment on a post, stamped with a snapshot of the comment's author.
async fn add_comment<DS: Client>(
    state: web::Data<State<DS>>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<TextBody>,
) -> Fallible<web::Json<Vec<Comment>>> {
    observe("add_comment", || async {
        check_valid(&*body)?;
        let post_id = parse_post_id(&path)?;
        let author = load_author(&*state.ds, identity).await?;
        let mut post = find_post(&*state.ds, post_id).await?;

        post.add_comment(body.text.clone(), &author);

        state.ds.save_post(&post).await?;
        Ok(web::Json(post.comments))
    })
    .await
}

// Delete a comment. Only its author may do this.
async fn delete_comment<DS: Client>(
    state: web::Data<State<DS>>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> Fallible<web::Json<Vec<Comment>>> {
    observe("delete_comment", || async {
        let (raw_post_id, raw_comment_id) = &*path;
        let post_id = parse_post_id(raw_post_id)?;
        let comment_id = Uuid::parse_str(raw_comment_id).describe_err(comment_not_found())?;
        let mut post = find_post(&*state.ds, post_id).await?;

        match post.delete_comment(comment_id, identity.user_id) {
            CommentDeletion::NoSuchComment => {
                return Err(anyhow!("no comment {} on post {}", comment_id, post_id)
                    .describe(comment_not_found()))
            }
            CommentDeletion::NotTheAuthor => {
                return Err(anyhow!(
                    "user {} doesn't own comment {}",
                    identity.user_id,
                    comment_id
                )
                .describe(not_authorized()))
            }
            CommentDeletion::Deleted => {}
        }

        state.ds.save_post(&post).await?;
        Ok(web::Json(post.comments))
    })
    .await
}

/// Run the validator checks on a request body, mapping failures into the structured
/// 400 the API promises.
fn check_valid<T: Validate>(body: &T) -> Fallible<()> {
    let errors = match body.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };
    let fields = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, complaints)| {
            complaints.iter().map(move |e| FieldError {
                param: field.to_owned(),
                msg: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    Err(anyhow!("request body failed validation").describe(ExternalError::invalid_fields(fields)))
}

/// Post ids arrive as path strings. A malformed id can't name any post, so it maps to
/// the same 404 as an absent one.
fn parse_post_id(raw: &str) -> Fallible<Uuid> {
    Uuid::parse_str(raw).describe_err(post_not_found())
}

async fn find_post<DS: Client>(ds: &DS, post_id: Uuid) -> Fallible<Post> {
    guard!(let Some(post) = ds.find_post(post_id).await? else {
        return Err(anyhow!("no post {}", post_id).describe(post_not_found()))
    });
    Ok(post)
}

/// Look up the acting user for a name/avatar snapshot. A token whose subject no longer
/// exists can't act, so a missing user maps to 401.
async fn load_author<DS: Client>(ds: &DS, identity: Identity) -> Fallible<User> {
    guard!(let Some(user) = ds.get_user(identity.user_id).await? else {
        return Err(anyhow!("token subject {} has no user record", identity.user_id)
            .describe(crate::auth::bad_token()))
    });
    Ok(user)
}

fn post_not_found() -> ExternalError {
    ExternalError::new(Cause::NotFound, "Post not found")
}

fn comment_not_found() -> ExternalError {
    ExternalError::new(Cause::NotFound, "Comment does not exist")
}

fn not_authorized() -> ExternalError {
    ExternalError::new(Cause::UserBadAuth, "User not authorized")
}
