use std::sync::Arc;

use crate::{
    breaker::CircuitBreaker,
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    mailer::{LogMailer, Mailer},
    notify::NotificationHub,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub breaker: Arc<CircuitBreaker>,
    pub notifier: NotificationHub,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = orm_from_pool(&pool);
        Self {
            breaker: Arc::new(CircuitBreaker::new(config.breaker)),
            config: Arc::new(config),
            notifier: NotificationHub::default(),
            mailer: Arc::new(LogMailer),
            pool,
            orm,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}
