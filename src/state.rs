use std::sync::Arc;

use crate::{
    config::AppConfig,
    domain::{catalog::Catalog, pricing::BidEstimator},
    error::AppResult,
    store::{Storage, Store},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub catalog: Arc<Catalog>,
    pub estimator: BidEstimator,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let storage = match &config.data_dir {
            Some(dir) => Storage::directory(dir).await?,
            None => Storage::memory(),
        };
        Self::build(storage, &config.jwt_secret).await
    }

    /// Demo catalog, memory-only storage.
    pub async fn in_memory(jwt_secret: &str) -> AppResult<Self> {
        Self::build(Storage::memory(), jwt_secret).await
    }

    pub async fn build(storage: Storage, jwt_secret: &str) -> AppResult<Self> {
        Ok(Self {
            store: Arc::new(Store::open(storage).await?),
            catalog: Arc::new(Catalog::demo()),
            estimator: BidEstimator::default(),
            jwt_secret: Arc::from(jwt_secret),
        })
    }
}
