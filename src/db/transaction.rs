//! Transaction records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Sqlite;

use super::DbPool;
use crate::Result;

/// A recorded balance movement.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub account_id: String,
    pub transaction_type: String,
    /// Amount credited to the account, in the account's currency.
    pub amount: f64,
    /// Currency the client moved money in.
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}

/// Data for a new transaction record.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub transaction_type: String,
    pub amount: f64,
    pub currency: String,
}

impl NewTransaction {
    /// A deposit record.
    pub fn deposit(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            transaction_type: "deposit".to_string(),
            amount,
            currency: currency.into(),
        }
    }
}

/// Repository for transaction records.
pub struct TransactionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> TransactionRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a record inside an open database transaction.
    pub(crate) async fn insert(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        account_id: &str,
        new: &NewTransaction,
    ) -> Result<Transaction> {
        let timestamp = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (account_id, transaction_type, amount, currency, timestamp)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(account_id)
        .bind(&new.transaction_type)
        .bind(new.amount)
        .bind(&new.currency)
        .bind(timestamp)
        .fetch_one(&mut **tx)
        .await?;

        Ok(Transaction {
            id,
            account_id: account_id.to_string(),
            transaction_type: new.transaction_type.clone(),
            amount: new.amount,
            currency: new.currency.clone(),
            timestamp,
        })
    }

    /// List an account's transactions, newest first.
    pub async fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let records = sqlx::query_as::<_, Transaction>(
            "SELECT id, account_id, transaction_type, amount, currency, timestamp
             FROM transactions WHERE account_id = ? ORDER BY id DESC",
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;
        Ok(records)
    }
}
