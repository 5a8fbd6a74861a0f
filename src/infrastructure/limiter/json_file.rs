use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};

use crate::{errors::StorageError, repositories::rate_limit::RateLimitStore};

/// `<ip>_<unix-ts>` keys mapped to the unix timestamp of the hit.
type HitMap = BTreeMap<String, i64>;

/// Sliding-window limiter persisted as a small JSON object shared by every
/// worker pointing at the same file.
pub struct JsonFileRateLimiter {
    path: PathBuf,
    limit: usize,
    window_secs: i64,
    lock: Mutex<()>,
}

impl JsonFileRateLimiter {
    pub fn new(path: impl Into<PathBuf>, limit: usize, window_secs: i64) -> Self {
        Self {
            path: path.into(),
            limit,
            window_secs,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HitMap, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(HitMap::new()),
            Ok(bytes) => match serde_json::from_slice::<HitMap>(&bytes) {
                Ok(map) => Ok(map),
                Err(e) => {
                    tracing::warn!("Discarding unreadable rate limit file {}: {}", self.path.display(), e);
                    Ok(HitMap::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HitMap::new()),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    async fn save(&self, hits: &HitMap) -> Result<(), StorageError> {
        let json = serde_json::to_vec(hits).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))
    }

    fn evict(&self, hits: &mut HitMap, now: i64) -> usize {
        let cutoff = now - self.window_secs;
        let before = hits.len();
        hits.retain(|_, ts| *ts > cutoff);
        before - hits.len()
    }
}

/// Key for a new hit; same-second hits from one client get a `-<n>` suffix.
fn hit_key(hits: &HitMap, ip: &str, now: i64) -> String {
    let base = format!("{}_{}", ip, now);
    if !hits.contains_key(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let key = format!("{}-{}", base, n);
        if !hits.contains_key(&key) {
            return key;
        }
        n += 1;
    }
}

fn hits_for(hits: &HitMap, ip: &str) -> usize {
    let prefix = format!("{}_", ip);
    hits.keys().filter(|k| k.starts_with(&prefix)).count()
}

#[async_trait]
impl RateLimitStore for JsonFileRateLimiter {
    async fn check_and_record(&self, ip: &str, now: i64) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().await;

        let mut hits = self.load().await?;
        self.evict(&mut hits, now);

        if hits_for(&hits, ip) >= self.limit {
            return Ok(false);
        }

        let key = hit_key(&hits, ip, now);
        hits.insert(key, now);
        self.save(&hits).await?;
        Ok(true)
    }

    async fn prune(&self, now: i64) -> Result<usize, StorageError> {
        let _guard = self.lock.lock().await;

        let mut hits = self.load().await?;
        let removed = self.evict(&mut hits, now);
        if removed > 0 {
            self.save(&hits).await?;
        }
        Ok(removed)
    }

    async fn tracked_hits(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[actix_rt::test]
    async fn persists_hits_in_documented_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rate_limit.json");
        let limiter = JsonFileRateLimiter::new(&path, 5, 3600);

        assert!(limiter.check_and_record("203.0.113.9", 1_700_000_000).await.unwrap());

        let stored: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(stored, serde_json::json!({"203.0.113.9_1700000000": 1_700_000_000}));
    }

    #[actix_rt::test]
    async fn blocks_the_sixth_hit_in_an_hour() {
        let dir = tempdir().unwrap();
        let limiter = JsonFileRateLimiter::new(dir.path().join("rl.json"), 5, 3600);

        for i in 0..5 {
            assert!(limiter.check_and_record("203.0.113.9", 10_000 + i).await.unwrap());
        }
        assert!(!limiter.check_and_record("203.0.113.9", 10_010).await.unwrap());
        assert!(limiter.check_and_record("203.0.113.90", 10_010).await.unwrap());
        assert!(limiter.check_and_record("203.0.113.9", 10_000 + 3600).await.unwrap());
    }

    #[actix_rt::test]
    async fn same_second_hits_are_all_counted() {
        let dir = tempdir().unwrap();
        let limiter = JsonFileRateLimiter::new(dir.path().join("rl.json"), 2, 3600);

        assert!(limiter.check_and_record("203.0.113.9", 500).await.unwrap());
        assert!(limiter.check_and_record("203.0.113.9", 500).await.unwrap());
        assert!(!limiter.check_and_record("203.0.113.9", 500).await.unwrap());
        assert_eq!(limiter.tracked_hits().await.unwrap(), 2);
    }

    #[actix_rt::test]
    async fn corrupt_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rl.json");
        std::fs::write(&path, b"{not json").unwrap();
        let limiter = JsonFileRateLimiter::new(&path, 1, 3600);

        assert!(limiter.check_and_record("203.0.113.9", 100).await.unwrap());
    }

    #[actix_rt::test]
    async fn prune_rewrites_file_without_expired_hits() {
        let dir = tempdir().unwrap();
        let limiter = JsonFileRateLimiter::new(dir.path().join("rl.json"), 5, 60);

        limiter.check_and_record("203.0.113.9", 100).await.unwrap();
        limiter.check_and_record("198.51.100.1", 150).await.unwrap();

        assert_eq!(limiter.prune(200).await.unwrap(), 1);
        assert_eq!(limiter.tracked_hits().await.unwrap(), 1);
        assert_eq!(limiter.prune(200).await.unwrap(), 0);
    }
}
