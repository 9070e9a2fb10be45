//! Postgres Repository
//!
//! sqlx-backed implementation of the account and verification-token
//! repositories. Row structs own the SQL-facing shapes; mapping into the
//! domain re-validates nothing except what the schema cannot express.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{account::Account, verification_token::VerificationToken};
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::domain::value_object::{
    AccountId, AccountPassword, AccountRole, DisplayName, Email, ExperienceLevel, PublicId,
};
use crate::error::{AuthError, AuthResult};

/// Postgres-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    public_id: String,
    email: String,
    display_name: String,
    github: Option<String>,
    experience_level: i16,
    password_hash: String,
    roles: Vec<i16>,
    email_verified: bool,
    email_resend_count: i32,
    last_email_resend_at: Option<DateTime<Utc>>,
    email_blocked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_domain(self) -> AuthResult<Account> {
        let roles: BTreeSet<AccountRole> =
            self.roles.into_iter().map(AccountRole::from_id).collect();

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            public_id: PublicId::parse_str(&self.public_id)?,
            email: Email::from_db(self.email),
            display_name: DisplayName::from_db(self.display_name),
            github: self.github,
            experience_level: ExperienceLevel::from_id(self.experience_level),
            password_hash: AccountPassword::from_phc_string(self.password_hash)?,
            roles,
            email_verified: self.email_verified,
            email_resend_count: u16::try_from(self.email_resend_count)
                .map_err(|_| AuthError::Internal("Negative resend count in storage".into()))?,
            last_email_resend_at: self.last_email_resend_at,
            email_blocked: self.email_blocked,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    token: String,
    account_id: Uuid,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

impl From<TokenRow> for VerificationToken {
    fn from(row: TokenRow) -> Self {
        VerificationToken {
            token: row.token,
            account_id: AccountId::from_uuid(row.account_id),
            expires_at: row.expires_at,
            used: row.used,
            created_at: row.created_at,
        }
    }
}

const SELECT_ACCOUNT: &str = "SELECT account_id, public_id, email, display_name, github, \
     experience_level, password_hash, roles, email_verified, email_resend_count, \
     last_email_resend_at, email_blocked, created_at, updated_at FROM accounts";

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let roles: Vec<i16> = account.roles.iter().map(|r| r.id()).collect();
        sqlx::query(
            "INSERT INTO accounts (account_id, public_id, email, display_name, github, \
             experience_level, password_hash, roles, email_verified, email_resend_count, \
             last_email_resend_at, email_blocked, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(account.account_id.as_uuid())
        .bind(account.public_id.as_str())
        .bind(account.email.as_str())
        .bind(account.display_name.as_str())
        .bind(&account.github)
        .bind(account.experience_level.id())
        .bind(account.password_hash.as_phc_string())
        .bind(&roles)
        .bind(account.email_verified)
        .bind(i32::from(account.email_resend_count))
        .bind(account.last_email_resend_at)
        .bind(account.email_blocked)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("{SELECT_ACCOUNT} WHERE account_id = $1"))
                .bind(account_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        row.map(AccountRow::into_domain).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(&format!("{SELECT_ACCOUNT} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(AccountRow::into_domain).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let roles: Vec<i16> = account.roles.iter().map(|r| r.id()).collect();
        sqlx::query(
            "UPDATE accounts SET display_name = $1, github = $2, experience_level = $3, \
             password_hash = $4, roles = $5, email_verified = $6, email_resend_count = $7, \
             last_email_resend_at = $8, email_blocked = $9, updated_at = $10 \
             WHERE account_id = $11",
        )
        .bind(account.display_name.as_str())
        .bind(&account.github)
        .bind(account.experience_level.id())
        .bind(account.password_hash.as_phc_string())
        .bind(&roles)
        .bind(account.email_verified)
        .bind(i32::from(account.email_resend_count))
        .bind(account.last_email_resend_at)
        .bind(account.email_blocked)
        .bind(account.updated_at)
        .bind(account.account_id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_resend(
        &self,
        account_id: &AccountId,
        expected_count: u16,
        now: DateTime<Utc>,
        token: &VerificationToken,
    ) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        // The count guard is the compare-and-set: a racing resend that
        // already advanced the counter makes this update a no-op.
        let updated = sqlx::query(
            "UPDATE accounts SET email_resend_count = $1, last_email_resend_at = $2, \
             updated_at = $2 \
             WHERE account_id = $3 AND email_resend_count = $4 AND email_blocked = FALSE",
        )
        .bind(i32::from(expected_count) + 1)
        .bind(now)
        .bind(account_id.as_uuid())
        .bind(i32::from(expected_count))
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM verification_tokens WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO verification_tokens (token, account_id, expires_at, used, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&token.token)
        .bind(token.account_id.as_uuid())
        .bind(token.expires_at)
        .bind(token.used)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

impl VerificationTokenRepository for PgAuthRepository {
    async fn create(&self, token: &VerificationToken) -> AuthResult<()> {
        sqlx::query(
            "INSERT INTO verification_tokens (token, account_id, expires_at, used, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&token.token)
        .bind(token.account_id.as_uuid())
        .bind(token.expires_at)
        .bind(token.used)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<VerificationToken>> {
        let row: Option<TokenRow> = sqlx::query_as(
            "SELECT token, account_id, expires_at, used, created_at \
             FROM verification_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(VerificationToken::from))
    }

    async fn update(&self, token: &VerificationToken) -> AuthResult<()> {
        sqlx::query("UPDATE verification_tokens SET used = $1 WHERE token = $2")
            .bind(token.used)
            .bind(&token.token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
