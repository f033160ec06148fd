use askama::Template;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{self, LOGIN_PATH, Profile, RequireAdmin},
    models::format_soles,
    routes::admin::{inventory::ProductRow, render, sales::SaleView},
    services::{admin_service, auth_service},
    state::AppState,
};

const BAD_CREDENTIALS: &str = "Usuario o contraseña incorrectos";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default, rename = "perfil")]
    pub profile: String,
}

pub async fn index() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

pub async fn login_page() -> AppResult<Html<String>> {
    render(&LoginTemplate { error: None })
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match auth_service::verify_admin(&state, &form.username, &form.password) {
        Ok(username) => {
            auth::sign_in(&session, &username).await?;
            Ok(Redirect::to("/admin/seleccionar_perfil").into_response())
        }
        Err(AppError::Unauthorized) => {
            let page = render(&LoginTemplate {
                error: Some(BAD_CREDENTIALS.to_string()),
            })?;
            Ok(page.into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn logout(session: Session) -> AppResult<Redirect> {
    auth::sign_out(&session).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

pub async fn profile_page(RequireAdmin(admin): RequireAdmin) -> AppResult<Html<String>> {
    render(&ProfileTemplate {
        username: admin.username,
        error: None,
    })
}

pub async fn select_profile(
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    match form.profile.parse::<Profile>() {
        Ok(profile) => {
            auth::select_profile(&session, profile).await?;
            tracing::info!(username = %admin.username, ?profile, "admin profile selected");
            Ok(Redirect::to(profile.home_path()).into_response())
        }
        Err(_) => {
            let page = render(&ProfileTemplate {
                username: admin.username,
                error: Some("Selecciona un perfil válido".to_string()),
            })?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Html<String>> {
    let stats = admin_service::dashboard(&state).await;
    let revenue: i64 = stats.recent_sales.iter().map(|s| s.total).sum();

    render(&DashboardTemplate {
        username: admin.username,
        total_products: stats.total_products,
        total_orders: stats.total_orders,
        total_users: stats.total_users,
        orders_today: stats.orders_today,
        low_stock: stats.low_stock.iter().map(ProductRow::from).collect(),
        recent_sales: stats.recent_sales.iter().map(SaleView::from).collect(),
        recent_revenue: format_soles(revenue),
    })
}

#[derive(Template)]
#[template(path = "admin/login.html")]
struct LoginTemplate {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/profile.html")]
struct ProfileTemplate {
    username: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
struct DashboardTemplate {
    username: String,
    total_products: i64,
    total_orders: i64,
    total_users: i64,
    orders_today: i64,
    low_stock: Vec<ProductRow>,
    recent_sales: Vec<SaleView>,
    recent_revenue: String,
}
