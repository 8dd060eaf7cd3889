use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::users::{
  entities::{User, UserRole},
  errors::{RepositoryError, UserError},
  ports::UserRepository,
  value_objects::SubjectId,
};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  subject_id: String,
  email: String,
  name: String,
  phone_number: String,
  state: String,
  city: String,
  role: String,
  phone_verified: bool,
  email_verified: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = UserError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let role: UserRole = row.role.parse().map_err(|_| {
      UserError::Repository(RepositoryError::CorruptRow(format!(
        "user {} has unknown role '{}'",
        row.id, row.role
      )))
    })?;

    Ok(User::from_db(
      row.id,
      row.subject_id,
      row.email,
      row.name,
      row.phone_number,
      row.state,
      row.city,
      role,
      row.phone_verified,
      row.email_verified,
      row.created_at,
      row.updated_at,
    ))
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, UserError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (
                id,
                subject_id,
                email,
                name,
                phone_number,
                state,
                city,
                role,
                phone_verified,
                email_verified,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id,
                subject_id,
                email,
                name,
                phone_number,
                state,
                city,
                role,
                phone_verified,
                email_verified,
                created_at,
                updated_at
            "#,
    )
    .bind(user.id)
    .bind(&user.subject_id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.phone_number)
    .bind(&user.state)
    .bind(&user.city)
    .bind(user.role.as_str())
    .bind(user.phone_verified)
    .bind(user.email_verified)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn find_by_subject_id(&self, subject_id: &SubjectId) -> Result<Option<User>, UserError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id,
                subject_id,
                email,
                name,
                phone_number,
                state,
                city,
                role,
                phone_verified,
                email_verified,
                created_at,
                updated_at
            FROM users
            WHERE subject_id = $1
            "#,
    )
    .bind(subject_id.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(User::try_from).transpose()
  }

  /// Verification flags are OR-ed with the stored values, so a stale copy
  /// of the row can never clear a flag set by a concurrent write.
  async fn update(&self, user: User) -> Result<User, UserError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                email = $2,
                name = $3,
                phone_number = $4,
                state = $5,
                city = $6,
                role = $7,
                phone_verified = users.phone_verified OR $8,
                email_verified = users.email_verified OR $9,
                updated_at = $10
            WHERE subject_id = $1
            RETURNING
                id,
                subject_id,
                email,
                name,
                phone_number,
                state,
                city,
                role,
                phone_verified,
                email_verified,
                created_at,
                updated_at
            "#,
    )
    .bind(&user.subject_id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.phone_number)
    .bind(&user.state)
    .bind(&user.city)
    .bind(user.role.as_str())
    .bind(user.phone_verified)
    .bind(user.email_verified)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }
}
