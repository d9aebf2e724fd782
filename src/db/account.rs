//! Bank accounts.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use super::transaction::{NewTransaction, Transaction};
use super::{is_unique_violation, DbPool};
use crate::{BankError, Result};

const ACCOUNT_COLUMNS: &str =
    "id, user_id, account_number, balance, currency, account_type, created_at, updated_at";

/// A bank account owned by one user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub account_number: String,
    pub balance: f64,
    pub currency: String,
    pub account_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for opening an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: String,
    pub account_number: String,
    pub currency: String,
    pub account_type: String,
}

/// Number of digits in an account number.
pub const ACCOUNT_NUMBER_LENGTH: usize = 10;

/// Generate a random account number of [`ACCOUNT_NUMBER_LENGTH`] digits.
pub fn generate_account_number() -> String {
    let mut rng = rand::rng();
    (0..ACCOUNT_NUMBER_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Repository for account operations.
pub struct AccountRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Open an account with a zero balance.
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let now = Utc::now();
        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_account.user_id.clone(),
            account_number: new_account.account_number.clone(),
            balance: 0.0,
            currency: new_account.currency.clone(),
            account_type: new_account.account_type.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO accounts (id, user_id, account_number, balance, currency, account_type, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(&account.user_id)
        .bind(&account.account_number)
        .bind(account.balance)
        .bind(&account.currency)
        .bind(&account.account_type)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BankError::Conflict("account number already in use".to_string())
            } else {
                BankError::Database(e.to_string())
            }
        })?;

        Ok(account)
    }

    /// List a user's accounts, oldest first.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Account>> {
        let sql =
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = ? ORDER BY created_at");
        let accounts = sqlx::query_as::<_, Account>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(accounts)
    }

    /// Get an account by its account number.
    pub async fn get_by_number(&self, account_number: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_number = ?");
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(account_number)
            .fetch_optional(self.pool)
            .await?;
        Ok(account)
    }

    /// Credit an account and record the transaction atomically.
    ///
    /// The balance is incremented in SQL so concurrent deposits do not lose updates.
    pub async fn credit(&self, account_id: &str, credit: &NewTransaction) -> Result<Transaction> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE accounts SET balance = balance + ?, updated_at = ? WHERE id = ?",
        )
        .bind(credit.amount)
        .bind(Utc::now())
        .bind(account_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(BankError::NotFound("account".to_string()));
        }

        let record = super::TransactionRepository::insert(&mut tx, account_id, credit).await?;
        tx.commit().await?;
        Ok(record)
    }
}
