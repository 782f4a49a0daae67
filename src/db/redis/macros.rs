/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when there is one. Otherwise awaits
/// `$block`, queues its value for a background write with `$ttl` seconds to
/// live, and returns it. A failing cache read is logged and treated as a
/// miss, so Redis being down only costs the cache.
///
/// # Example
/// ```rust,ignore
/// let catalog: Vec<Recipe> = cached!(self.cache, CacheKey::Catalog, 300, async move {
///     load_catalog(&pool).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
