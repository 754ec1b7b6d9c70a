//! Diesel schema for tracker persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Owning principal.
        owner_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Board records; a null position marks a hidden board.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Board name.
        #[max_length = 255]
        name -> Varchar,
        /// Owning project.
        project_id -> Uuid,
        /// Sort position among the project's visible boards.
        position -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Owning project.
        project_id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project-scoped tag records, keyed by composite identity.
    tags (project_id, slug) {
        /// Owning project.
        project_id -> Uuid,
        /// Normalized slug.
        #[max_length = 255]
        slug -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task-tag association edges, keyed by composite identity.
    task_tags (task_id, project_id, tag_slug) {
        /// Tagged task.
        task_id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Associated tag slug.
        #[max_length = 255]
        tag_slug -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(boards -> projects (project_id));
diesel::joinable!(tasks -> projects (project_id));
diesel::joinable!(task_tags -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(projects, boards, tasks, tags, task_tags);
