//! Postgres-backed implementation of the storage traits.
//!
//! Each submodule implements one trait from [`crate::database::store`] for [`PgStore`].

use sqlx::PgPool;

pub mod activity;
pub mod budget_request;
pub mod expense;
pub mod stats;
pub mod user;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
