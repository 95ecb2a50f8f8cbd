diesel::table! {
    base_entities (id) {
        id -> Integer,
        owner -> Text,
        name -> Text,
        read_acl -> Jsonb,
        created_at -> Text,
    }
}

diesel::table! {
    entities (id) {
        id -> Integer,
        base_id -> Integer,
        owner -> Text,
        name -> Text,
        series -> Text,
        revision -> Integer,
        blob_hash -> Text,
        blob_size -> BigInt,
        upload_time -> Text,
        extra_info -> Nullable<Jsonb>,
        downloads -> BigInt,
    }
}

diesel::joinable!(entities -> base_entities (base_id));

diesel::allow_tables_to_appear_in_same_query!(base_entities, entities,);
