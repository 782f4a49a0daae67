pub mod catalog;
pub mod postgres;
pub mod redis;

pub use catalog::{CatalogStore, PgCatalog, RecipeFilter};
pub use postgres::create_pool;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
