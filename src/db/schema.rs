pub const SCHEMA: &str = "
    -- One row per user, created lazily on first increment
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uid INTEGER NOT NULL UNIQUE,
        counter INTEGER NOT NULL DEFAULT 0,
        vote_counter INTEGER NOT NULL DEFAULT 0,
        username TEXT NOT NULL DEFAULT '',
        alt_username TEXT NOT NULL DEFAULT '',
        activity_seq INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_users_username ON users (username);
    -- MAX(activity_seq) runs on every activity upsert
    CREATE INDEX IF NOT EXISTS idx_users_activity_seq ON users (activity_seq);

    -- Append-only; (chat_id, message_id) is not unique
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        chat_id INTEGER NOT NULL,
        message_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        user_name TEXT NOT NULL,
        text TEXT NOT NULL,
        date INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_messages_chat_message ON messages (chat_id, message_id);
    CREATE INDEX IF NOT EXISTS idx_messages_user_chat ON messages (user_id, chat_id);

    CREATE TABLE IF NOT EXISTS settings (
        chat_id INTEGER PRIMARY KEY,
        pause BOOLEAN NOT NULL DEFAULT FALSE,
        log_recipients TEXT NOT NULL DEFAULT '[]'
    );

    CREATE TABLE IF NOT EXISTS ban_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uid INTEGER NOT NULL,
        user_info TEXT NOT NULL,
        moderator_id INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_ban_log_uid ON ban_log (uid);
";
