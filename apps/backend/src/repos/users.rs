//! User repository functions for the domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::adapters::users_sea as users_adapter;
use crate::entities::users;
use crate::errors::domain::DomainError;

pub use crate::entities::users::Role;

/// User domain model: the authenticated principal, hash included.
/// Anything that leaves the process goes through a response DTO instead.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_admin: bool,
    pub mobile: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let model = users_adapter::find_by_email(conn, email).await?;
    Ok(model.map(User::from))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<Option<User>, DomainError> {
    let model = users_adapter::find_by_id(conn, id).await?;
    Ok(model.map(User::from))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: User,
) -> Result<User, DomainError> {
    let model = users_adapter::insert(conn, user.into_model()).await?;
    Ok(User::from(model))
}

/// Persist the full record; last-write-wins at the row level.
pub async fn save<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: User,
) -> Result<User, DomainError> {
    let model = users_adapter::update(conn, user.into_model()).await?;
    Ok(User::from(model))
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<bool, DomainError> {
    users_adapter::delete_by_id(conn, id).await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: u64,
    page_size: u64,
    search: Option<&str>,
) -> Result<(Vec<User>, u64), DomainError> {
    let (models, total) = users_adapter::list(conn, page, page_size, search).await?;
    Ok((models.into_iter().map(User::from).collect(), total))
}

// Conversions between SeaORM models and the domain model

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            role: model.role,
            is_admin: model.is_admin,
            mobile: model.mobile,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl User {
    fn into_model(self) -> users::Model {
        users::Model {
            id: self.id,
            name: self.name,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            is_admin: self.is_admin,
            mobile: self.mobile,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
