table! {
    posts (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        text -> Text,
        user_id -> Uuid,
        name -> Text,
        avatar -> Text,
        likes -> Jsonb,
        comments -> Jsonb,
    }
}

table! {
    users (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        name -> Text,
        avatar -> Text,
        password_hash -> Text,
    }
}

joinable!(posts -> users (user_id));
allow_tables_to_appear_in_same_query!(posts, users);
