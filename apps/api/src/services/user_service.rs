//! Account service: registration, lookups, profile edits, purchase history.

use chrono::Utc;
use tracing::info;

use bazaar_core::{Money, RegisterUser, Transaction, UpdateProfile, User};
use bazaar_db::{Database, DbError};

use crate::error::{ApiError, ApiResult};
use crate::password::hash_password;

#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
    signup_balance: Money,
}

impl UserService {
    pub fn new(db: Database, signup_balance: Money) -> Self {
        UserService { db, signup_balance }
    }

    /// Create an account. The password is stored only as an argon2 hash.
    pub async fn register(&self, cmd: RegisterUser) -> ApiResult<User> {
        cmd.validate()?;

        let now = Utc::now();
        let user = User {
            email: cmd.email,
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            password_hash: hash_password(&cmd.password)?,
            balance: self.signup_balance,
            created_at: now,
            updated_at: now,
        };

        let user = self.db.users().insert(&user).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => ApiError::Conflict("Email already taken".to_string()),
            other => other.into(),
        })?;

        info!(email = %user.email, "User registered");
        Ok(user)
    }

    pub async fn list(&self) -> ApiResult<Vec<User>> {
        Ok(self.db.users().list().await?)
    }

    pub async fn get(&self, email: &str) -> ApiResult<User> {
        self.db
            .users()
            .get_by_email(email)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Change the caller's first and last name.
    pub async fn update_profile(&self, email: &str, cmd: UpdateProfile) -> ApiResult<User> {
        cmd.validate()?;

        let user = self
            .db
            .users()
            .update_names(email, &cmd.first_name, &cmd.last_name)
            .await?;

        info!(email = %email, "Profile updated");
        Ok(user)
    }

    /// The caller's ledger entries, newest first.
    pub async fn transactions(&self, email: &str) -> ApiResult<Vec<Transaction>> {
        Ok(self.db.ledger().list_by_user(email).await?)
    }

    /// One of the caller's ledger entries. Other buyers' entries are `NotFound`.
    pub async fn transaction(&self, email: &str, id: &str) -> ApiResult<Transaction> {
        self.db
            .ledger()
            .get_by_id(id)
            .await?
            .filter(|entry| entry.user_email == email)
            .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::services::{testing, PurchaseService};
    use bazaar_core::BuyCommand;

    fn register_cmd(email: &str) -> RegisterUser {
        RegisterUser {
            email: email.to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_and_credits() {
        let db = testing::db().await;
        let users = UserService::new(db.clone(), Money::from_cents(1000));

        let user = users.register(register_cmd("ann@example.com")).await.unwrap();
        assert_eq!(user.balance, Money::from_cents(1000));
        assert_ne!(user.password_hash, "correct horse");

        let stored = users.get("ann@example.com").await.unwrap();
        assert!(verify_password("correct horse", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let db = testing::db().await;
        let users = UserService::new(db, Money::zero());

        users.register(register_cmd("ann@example.com")).await.unwrap();
        let err = users.register(register_cmd("ann@example.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Email already taken"));
    }

    #[tokio::test]
    async fn test_register_validates_before_writing() {
        let db = testing::db().await;
        let users = UserService::new(db, Money::zero());

        let mut cmd = register_cmd("ann@example.com");
        cmd.password = "short".to_string();
        assert!(matches!(
            users.register(cmd).await,
            Err(ApiError::Validation(_))
        ));
        assert!(users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_and_lookup() {
        let db = testing::db().await;
        let users = UserService::new(db, Money::zero());
        users.register(register_cmd("ann@example.com")).await.unwrap();

        let updated = users
            .update_profile(
                "ann@example.com",
                UpdateProfile {
                    first_name: "Annie".to_string(),
                    last_name: "Lee".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Annie");

        assert!(matches!(
            users.get("bob@example.com").await,
            Err(ApiError::NotFound(_))
        ));
        assert!(users.transactions("ann@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transaction_is_visible_only_to_its_buyer() {
        let db = testing::db().await;
        testing::user(&db, "seller@example.com", "pw", 0).await;
        testing::user(&db, "buyer@example.com", "pw", 1000).await;
        let store = testing::store(&db, "seller@example.com").await;
        let product = testing::product(&db, &store.id, 300, 5).await;

        let entry = PurchaseService::new(db.clone())
            .buy(BuyCommand {
                buyer_email: "buyer@example.com".to_string(),
                product_id: product.id.clone(),
                quantity: 2,
            })
            .await
            .unwrap();

        let users = UserService::new(db, Money::zero());
        let found = users.transaction("buyer@example.com", &entry.id).await.unwrap();
        assert_eq!(found.id, entry.id);
        assert_eq!(found.quantity, 2);
        assert_eq!(found.total_price, Money::from_cents(600));

        assert!(matches!(
            users.transaction("seller@example.com", &entry.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            users.transaction("buyer@example.com", "missing").await,
            Err(ApiError::NotFound(_))
        ));
    }
}
