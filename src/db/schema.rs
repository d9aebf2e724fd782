//! Database schema and migrations for pinbank.
//!
//! Migrations run in order; `schema_version` records which ones were applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          TEXT PRIMARY KEY,                -- UUID v4
    dni         TEXT NOT NULL UNIQUE,            -- normalized DNI/NIE
    pin_hash    TEXT NOT NULL,                   -- Argon2 PHC string
    full_name   TEXT NOT NULL,
    email       TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#,
    // v2: accounts
    r#"
CREATE TABLE accounts (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(id),
    account_number  TEXT NOT NULL UNIQUE,
    balance         REAL NOT NULL DEFAULT 0,
    currency        TEXT NOT NULL DEFAULT 'USD',
    account_type    TEXT NOT NULL DEFAULT 'checking',
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX idx_accounts_user_id ON accounts(user_id);
"#,
    // v3: transactions
    r#"
CREATE TABLE transactions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id        TEXT NOT NULL REFERENCES accounts(id),
    transaction_type  TEXT NOT NULL,
    amount            REAL NOT NULL,
    currency          TEXT NOT NULL,
    timestamp         TEXT NOT NULL
);

CREATE INDEX idx_transactions_account_id ON transactions(account_id);
"#,
];
