use crate::models::{StoredMealPlan, StoredWorkoutPlan};
use chrono::{DateTime, Utc};
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

const KEY_PREFIX: &str = "fitjourney";

/// Replace the slot only when the incoming plan is not older than the cached one.
/// KEYS[1] = slot, ARGV = created_at millis, plan json, ttl seconds
const STORE_IF_NEWER: &str = r"
local ts = redis.call('HGET', KEYS[1], 'ts')
if ts and tonumber(ts) > tonumber(ARGV[1]) then
    return 0
end
redis.call('HSET', KEYS[1], 'ts', ARGV[1], 'json', ARGV[2])
redis.call('EXPIRE', KEYS[1], ARGV[3])
return 1
";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Which "current plan" slot an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Workout,
    Meal,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Workout => "workout_plan",
            PlanKind::Meal => "meal_plan",
        }
    }

    pub fn key(&self, user_id: &Uuid) -> String {
        format!("{}:{}:{}", KEY_PREFIX, self.as_str(), user_id)
    }
}

#[derive(Clone)]
struct Slot {
    created_at: DateTime<Utc>,
    json: Arc<str>,
}

enum Backend {
    Shared(ConnectionManager),
    Local(Cache<String, Slot>),
}

/// Cache of each user's most recent plans
///
/// With Redis configured every instance reads and writes the same slots;
/// otherwise plans live in an in-process moka cache. A slot only ever moves
/// forward in `created_at`, so a slow read-through write cannot replace a
/// plan generated after it.
pub struct PlanCache {
    backend: Backend,
    ttl_secs: u64,
}

impl PlanCache {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            backend: Backend::Shared(redis),
            ttl_secs,
        })
    }

    /// In-process cache only; plans are not shared between instances
    pub fn local_only(capacity: u64, ttl_secs: u64) -> Self {
        let local = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            backend: Backend::Local(local),
            ttl_secs,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.backend, Backend::Shared(_))
    }

    pub async fn workout_plan(
        &self,
        user_id: &Uuid,
    ) -> Result<Option<StoredWorkoutPlan>, CacheError> {
        self.fetch(PlanKind::Workout, user_id).await
    }

    pub async fn store_workout_plan(&self, plan: &StoredWorkoutPlan) -> Result<bool, CacheError> {
        self.store(PlanKind::Workout, &plan.user_id, plan.created_at, plan)
            .await
    }

    pub async fn meal_plan(&self, user_id: &Uuid) -> Result<Option<StoredMealPlan>, CacheError> {
        self.fetch(PlanKind::Meal, user_id).await
    }

    pub async fn store_meal_plan(&self, plan: &StoredMealPlan) -> Result<bool, CacheError> {
        self.store(PlanKind::Meal, &plan.user_id, plan.created_at, plan)
            .await
    }

    pub async fn fetch<T>(&self, kind: PlanKind, user_id: &Uuid) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        let key = kind.key(user_id);

        let json: Option<String> = match &self.backend {
            Backend::Local(local) => local.get(&key).await.map(|slot| slot.json.to_string()),
            Backend::Shared(redis) => {
                let mut conn = redis.clone();
                conn.hget(&key, "json").await?
            }
        };

        match json {
            Some(json) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Write a slot unless it already holds a plan created later
    ///
    /// Returns whether the value was stored.
    pub async fn store<T>(
        &self,
        kind: PlanKind,
        user_id: &Uuid,
        created_at: DateTime<Utc>,
        value: &T,
    ) -> Result<bool, CacheError>
    where
        T: Serialize,
    {
        let key = kind.key(user_id);
        let json = serde_json::to_string(value)?;

        let stored = match &self.backend {
            Backend::Shared(redis) => {
                let mut conn = redis.clone();
                let written: i64 = Script::new(STORE_IF_NEWER)
                    .key(&key)
                    .arg(created_at.timestamp_millis())
                    .arg(&json)
                    .arg(self.ttl_secs)
                    .invoke_async(&mut conn)
                    .await?;
                written == 1
            }
            Backend::Local(local) => {
                let slot = Slot {
                    created_at,
                    json: Arc::from(json),
                };
                let result = local
                    .entry(key.clone())
                    .and_compute_with(move |current| {
                        let newer_cached = current
                            .map_or(false, |entry| entry.value().created_at > slot.created_at);
                        std::future::ready(if newer_cached { Op::Nop } else { Op::Put(slot) })
                    })
                    .await;
                matches!(result, CompResult::Inserted(_) | CompResult::ReplacedWith(_))
            }
        };

        if !stored {
            tracing::debug!("Kept newer cached plan: {}", key);
        }
        Ok(stored)
    }
}
