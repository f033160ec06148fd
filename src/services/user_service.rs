use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;

use crate::{
    dto::orders::CustomerInfo,
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    state::AppState,
};

/// Returns the user registered under the customer's email, creating it on first purchase.
///
/// An existing user is reused as-is; later checkouts never overwrite stored contact data.
pub async fn find_or_create_user<C>(conn: &C, customer: &CustomerInfo) -> AppResult<User>
where
    C: ConnectionTrait,
{
    let name = customer.name.trim();
    let email = customer.email.trim().to_lowercase();
    if name.is_empty() {
        return Err(AppError::BadRequest("customer name is required".into()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("a valid customer email is required".into()));
    }

    if let Some(existing) = Users::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(conn)
        .await?
    {
        return Ok(user_from_entity(existing));
    }

    let user = ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        email: Set(email),
        phone: Set(clean(customer.phone.as_deref())),
        address: Set(clean(customer.address.as_deref())),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;

    tracing::info!(user_id = user.id, "customer registered");
    Ok(user_from_entity(user))
}

pub async fn count_users(state: &AppState) -> AppResult<i64> {
    let total = Users::find().count(&state.orm).await?;
    Ok(total as i64)
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        address: model.address,
        created_at: model.created_at,
    }
}
