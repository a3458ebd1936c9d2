//! Key-value storage service holding the dashboard's serialized records.
//!
//! The surface mirrors browser local storage: string keys, string values,
//! no schema. Handlers receive a `Store` through `web::Data` and re-read it on
//! every request; nothing is cached between requests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::errors::AppError;

/// Storage backend selected once at startup.
#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl Store {
    pub async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        match self {
            Store::Memory(s) => Ok(s.get_item(key)),
            Store::Postgres(s) => Ok(s.get_item(key).await?),
        }
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        match self {
            Store::Memory(s) => {
                s.set_item(key, value);
                Ok(())
            }
            Store::Postgres(s) => Ok(s.set_item(key, value).await?),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Postgres(_) => "postgres",
        }
    }
}

impl From<MemoryStore> for Store {
    fn from(s: MemoryStore) -> Self {
        Store::Memory(s)
    }
}

impl From<PgStore> for Store {
    fn from(s: PgStore) -> Self {
        Store::Postgres(s)
    }
}
