use std::sync::Arc;

use crate::{
    config::{AdminCredential, AppConfig},
    db::{DbPool, OrmConn, create_orm_conn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub admins: Arc<Vec<AdminCredential>>,
    pub low_stock_threshold: i32,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        let orm = create_orm_conn(&pool);
        Self {
            pool,
            orm,
            admins: Arc::new(config.admins.clone()),
            low_stock_threshold: config.low_stock_threshold,
        }
    }
}
