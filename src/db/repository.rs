//! User repository for pinbank.

use chrono::Utc;

use super::user::{NewUser, User};
use super::{is_unique_violation, DbPool};
use crate::{BankError, Result};

const USER_COLUMNS: &str = "id, dni, pin_hash, full_name, email, created_at, updated_at";

/// Repository for user persistence.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a user.
    ///
    /// A single INSERT guarded by the UNIQUE index on `dni`: of concurrent
    /// signups for the same national ID at most one succeeds and every other
    /// one gets `Conflict`.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            dni: new_user.dni.clone(),
            pin_hash: new_user.pin_hash.clone(),
            full_name: new_user.full_name.clone(),
            email: new_user.email.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO users (id, dni, pin_hash, full_name, email, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.dni)
        .bind(&user.pin_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BankError::Conflict("national ID already registered".to_string())
            } else {
                BankError::Database(e.to_string())
            }
        })?;

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by normalized national ID.
    pub async fn get_by_dni(&self, dni: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE dni = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(dni)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Replace the PIN hash and bump `updated_at`.
    ///
    /// Returns false if no user has this ID.
    pub async fn update_pin_hash(&self, id: &str, pin_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET pin_hash = ?, updated_at = ? WHERE id = ?")
            .bind(pin_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn user_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    fn sample_user(dni: &str) -> NewUser {
        NewUser::new(dni, "hashed", "Jane Roe", "jane@x.com")
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&sample_user("12345678Z")).await.unwrap();
        assert!(!user.id.is_empty());
        assert_eq!(user.dni, "12345678Z");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_create_duplicate_dni() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&sample_user("12345678Z")).await.unwrap();
        let result = repo.create(&sample_user("12345678Z")).await;

        assert!(matches!(result, Err(BankError::Conflict(_))));
        assert_eq!(user_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_get_by_id_and_dni() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        let created = repo.create(&sample_user("12345678Z")).await.unwrap();

        let by_id = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.dni, "12345678Z");

        let by_dni = repo.get_by_dni("12345678Z").await.unwrap().unwrap();
        assert_eq!(by_dni.id, created.id);
        assert_eq!(by_dni.pin_hash, "hashed");

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert!(repo.get_by_dni("00000000T").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_pin_hash() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        let created = repo.create(&sample_user("12345678Z")).await.unwrap();

        let updated = repo.update_pin_hash(&created.id, "new-hash").await.unwrap();
        assert!(updated);

        let user = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(user.pin_hash, "new-hash");
        assert!(user.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_pin_hash_missing_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(!repo.update_pin_hash("missing", "hash").await.unwrap());
    }

    async fn concurrent_creates(db: &Database, dnis: Vec<String>) -> Vec<Result<User>> {
        let handles: Vec<_> = dnis
            .into_iter()
            .map(|dni| {
                let db = db.clone();
                tokio::spawn(async move {
                    UserRepository::new(db.pool())
                        .create(&sample_user(&dni))
                        .await
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signups_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("bank.db")).await.unwrap();

        let dnis = (0..16).map(|i| format!("{i:08}X")).collect();
        let results = concurrent_creates(&db, dnis).await;

        for result in &results {
            assert!(result.is_ok(), "{result:?}");
        }
        assert_eq!(user_count(&db).await, 16);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_signups_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("bank.db")).await.unwrap();

        let dnis = vec!["12345678Z".to_string(); 16];
        let results = concurrent_creates(&db, dnis).await;

        let created = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(BankError::Conflict(_))))
            .count();
        assert_eq!(created, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(user_count(&db).await, 1);
    }
}
