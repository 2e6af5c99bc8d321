//! SeaORM adapter for the user store.
//!
//! All queries are single-record and keyed (email, id) apart from the
//! admin listing, which is paginated. Query code lives here; domain
//! conversions live in `repos::users`.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, DomainError> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
        .map_err(map_db_err)
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DomainError> {
    users::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(map_db_err)
}

fn to_active(model: users::Model) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        username: Set(model.username),
        email: Set(model.email),
        password_hash: Set(model.password_hash),
        role: Set(model.role),
        is_admin: Set(model.is_admin),
        mobile: Set(model.mobile),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    model: users::Model,
) -> Result<users::Model, DomainError> {
    to_active(model).insert(conn).await.map_err(map_db_err)
}

/// Full-record update: last-write-wins at the row level.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    model: users::Model,
) -> Result<users::Model, DomainError> {
    to_active(model).update(conn).await.map_err(map_db_err)
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<bool, DomainError> {
    let result = users::Entity::delete_by_id(id)
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}

/// Paginated listing with optional case-insensitive name/email search.
/// `page` is 1-based, matching the HTTP query contract.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    page: u64,
    page_size: u64,
    search: Option<&str>,
) -> Result<(Vec<users::Model>, u64), DomainError> {
    let mut query = users::Entity::find().order_by_asc(users::Column::CreatedAt);

    if let Some(needle) = search.filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", needle.trim().to_lowercase());
        query = query.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(users::Column::Name)))
                        .like(pattern.clone()),
                )
                .add(Expr::expr(Func::lower(Expr::col(users::Column::Email))).like(pattern)),
        );
    }

    let paginator = query.paginate(conn, page_size.max(1));
    let total = paginator.num_items().await.map_err(map_db_err)?;
    let models = paginator
        .fetch_page(page.max(1) - 1)
        .await
        .map_err(map_db_err)?;

    Ok((models, total))
}
