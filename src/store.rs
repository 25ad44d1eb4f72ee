use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{
    fs,
    sync::{Mutex, RwLock},
};
use uuid::Uuid;

use crate::{
    audit::AuditEntry,
    domain::{cart::Cart, subscription::Subscription},
    error::AppResult,
    models::{DeliveryBid, Order, User},
};

pub const USERS_KEY: &str = "cloudbites_users";
pub const CARTS_KEY: &str = "cloudbites_carts";
pub const FAVORITES_KEY: &str = "cloudbites_favorites";

/// Key/value blob storage for JSON documents.
#[derive(Debug)]
pub enum Storage {
    Memory(Mutex<HashMap<String, String>>),
    /// One `<key>.json` file per key.
    Directory(PathBuf),
}

impl Storage {
    pub fn memory() -> Self {
        Storage::Memory(Mutex::new(HashMap::new()))
    }

    pub async fn directory(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        fs::create_dir_all(&path).await?;
        Ok(Storage::Directory(path))
    }

    fn file_for(dir: &std::path::Path, key: &str) -> PathBuf {
        dir.join(format!("{key}.json"))
    }

    pub async fn read_raw(&self, key: &str) -> AppResult<Option<String>> {
        match self {
            Storage::Memory(map) => Ok(map.lock().await.get(key).cloned()),
            Storage::Directory(dir) => match fs::read_to_string(Self::file_for(dir, key)).await {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            },
        }
    }

    pub async fn write_raw(&self, key: &str, value: String) -> AppResult<()> {
        match self {
            Storage::Memory(map) => {
                map.lock().await.insert(key.to_string(), value);
                Ok(())
            }
            Storage::Directory(dir) => {
                // Write then rename so readers never see a half-written blob.
                let target = Self::file_for(dir, key);
                let tmp = dir.join(format!("{key}.json.tmp"));
                fs::write(&tmp, value).await?;
                fs::rename(&tmp, &target).await?;
                Ok(())
            }
        }
    }

    pub async fn remove(&self, key: &str) -> AppResult<()> {
        match self {
            Storage::Memory(map) => {
                map.lock().await.remove(key);
                Ok(())
            }
            Storage::Directory(dir) => match fs::remove_file(Self::file_for(dir, key)).await {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            },
        }
    }

    /// Missing keys load as the default; unreadable JSON is dropped and also loads as the default.
    pub async fn load<T>(&self, key: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.read_raw(key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding corrupted stored data");
                self.remove(key).await?;
                Ok(T::default())
            }
        }
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.write_raw(key, raw).await
    }
}

/// All mutable application state. Users, carts and favorites are written
/// back to [`Storage`] on change; orders, bids, subscriptions and the audit
/// trail live for the lifetime of the process.
#[derive(Debug)]
pub struct Store {
    storage: Storage,
    pub users: RwLock<Vec<User>>,
    pub carts: RwLock<HashMap<Uuid, Cart>>,
    pub favorites: RwLock<HashMap<Uuid, Vec<String>>>,
    pub orders: RwLock<Vec<Order>>,
    pub bids: RwLock<Vec<DeliveryBid>>,
    pub subscriptions: RwLock<Vec<Subscription>>,
    pub audit_logs: RwLock<Vec<AuditEntry>>,
}

impl Store {
    pub async fn open(storage: Storage) -> AppResult<Self> {
        let users: Vec<User> = storage.load(USERS_KEY).await?;
        let carts: HashMap<Uuid, Cart> = storage.load(CARTS_KEY).await?;
        let favorites: HashMap<Uuid, Vec<String>> = storage.load(FAVORITES_KEY).await?;
        tracing::debug!(
            users = users.len(),
            carts = carts.len(),
            "loaded persisted state"
        );
        Ok(Self {
            storage,
            users: RwLock::new(users),
            carts: RwLock::new(carts),
            favorites: RwLock::new(favorites),
            orders: RwLock::new(Vec::new()),
            bids: RwLock::new(Vec::new()),
            subscriptions: RwLock::new(Vec::new()),
            audit_logs: RwLock::new(Vec::new()),
        })
    }

    /// Apply `change` to a copy of the guarded value, persist the copy under
    /// `key`, and only then publish it. A failed write leaves memory as it was.
    async fn commit<T, R, F>(&self, lock: &RwLock<T>, key: &str, change: F) -> AppResult<R>
    where
        T: Clone + Serialize,
        F: FnOnce(&mut T) -> AppResult<R>,
    {
        let mut current = lock.write().await;
        let mut next = current.clone();
        let out = change(&mut next)?;
        self.storage.save(key, &next).await?;
        *current = next;
        Ok(out)
    }

    pub async fn update_users<R>(
        &self,
        change: impl FnOnce(&mut Vec<User>) -> AppResult<R>,
    ) -> AppResult<R> {
        self.commit(&self.users, USERS_KEY, change).await
    }

    pub async fn update_carts<R>(
        &self,
        change: impl FnOnce(&mut HashMap<Uuid, Cart>) -> AppResult<R>,
    ) -> AppResult<R> {
        self.commit(&self.carts, CARTS_KEY, change).await
    }

    pub async fn update_favorites<R>(
        &self,
        change: impl FnOnce(&mut HashMap<Uuid, Vec<String>>) -> AppResult<R>,
    ) -> AppResult<R> {
        self.commit(&self.favorites, FAVORITES_KEY, change).await
    }
}
