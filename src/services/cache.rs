use crate::models::{Match, MatchListResponse};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Keys fetched per SCAN round trip when invalidating by pattern
const SCAN_BATCH: usize = 200;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Two-tier cache for ranked match listings
///
/// L1 is an in-process moka cache, L2 is Redis shared across instances.
/// Both tiers expire listings after the configured TTL; writers drop the
/// listings a changed match appears in.
pub struct CacheManager {
    redis: ConnectionManager,
    l1_cache: moka::future::Cache<String, MatchListResponse>,
    ttl_secs: u64,
}

impl CacheManager {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis,
            l1_cache,
            ttl_secs,
        })
    }

    /// Cached listing for a key, L1 first, then Redis
    pub async fn listing(&self, key: &str) -> Result<Option<MatchListResponse>, CacheError> {
        if let Some(listing) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(listing));
        }

        let mut conn = self.redis.clone();
        let Some(json) = conn.get::<_, Option<String>>(key).await? else {
            tracing::trace!("Cache miss: {}", key);
            return Ok(None);
        };

        tracing::trace!("L2 cache hit: {}", key);
        let listing: MatchListResponse = serde_json::from_str(&json)?;
        self.l1_cache.insert(key.to_string(), listing.clone()).await;

        Ok(Some(listing))
    }

    pub async fn store_listing(&self, key: &str, listing: &MatchListResponse) -> Result<(), CacheError> {
        let json = serde_json::to_string(listing)?;
        self.l1_cache.insert(key.to_string(), listing.clone()).await;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(key, json, self.ttl_secs).await?;

        tracing::trace!("Cached listing: {}", key);
        Ok(())
    }

    /// Drop the candidate and job listings every given match appears in
    pub async fn invalidate_matches(&self, matches: &[Match]) -> Result<(), CacheError> {
        let keys = listing_keys(matches);
        if keys.is_empty() {
            return Ok(());
        }

        for key in &keys {
            self.l1_cache.invalidate(key).await;
        }

        let mut conn = self.redis.clone();
        conn.del::<_, ()>(&keys).await?;

        tracing::trace!("Invalidated {} listings", keys.len());
        Ok(())
    }

    /// Drop every cached listing, used after sweeps and seeding
    pub async fn invalidate_all(&self) -> Result<(), CacheError> {
        // L1 has no pattern lookup
        self.l1_cache.invalidate_all();

        let mut conn = self.redis.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(CacheKey::ALL_MATCHES)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                conn.del::<_, ()>(&keys).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!("Invalidated {} cached listings", removed);
        Ok(())
    }
}

/// Distinct listing keys touched by a set of matches
fn listing_keys(matches: &[Match]) -> Vec<String> {
    let mut keys: Vec<String> = matches
        .iter()
        .flat_map(|m| [CacheKey::candidate_matches(m.candidate_id), CacheKey::job_matches(m.job_id)])
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Pattern covering every match listing
    pub const ALL_MATCHES: &'static str = "matches:*";

    pub fn candidate_matches(candidate_id: Uuid) -> String {
        format!("matches:candidate:{}", candidate_id)
    }

    pub fn job_matches(job_id: Uuid) -> String {
        format!("matches:job:{}", job_id)
    }
}
