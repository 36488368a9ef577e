use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use utoipa::ToSchema;

use crate::clock::Clock;
use crate::elements::{BundledElementSet, ElementSet, ElementSource, ElementsError};

pub const DEFAULT_MAX_AGE: Duration = Duration::hours(6);

#[derive(Debug, Clone)]
pub struct CachedElementSet {
    pub value: ElementSet,
    pub fetched_at: DateTime<Utc>,
}

impl CachedElementSet {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// Fresh while strictly younger than `max_age`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now) < max_age
    }
}

/// Where a resolved element set came from.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    Live {
        source: String,
    },
    Cached {
        fetched_at: DateTime<Utc>,
        age_seconds: i64,
    },
    Bundled {
        version: String,
    },
}

impl Provenance {
    /// True when the data is not from a live fetch and accuracy may be reduced.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Provenance::Live { .. })
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Live { source } => write!(f, "live data from {}", source),
            Provenance::Cached {
                fetched_at,
                age_seconds,
            } => write!(
                f,
                "cached data fetched at {} ({} min old)",
                fetched_at.format("%Y-%m-%d %H:%M:%SZ"),
                age_seconds / 60
            ),
            Provenance::Bundled { version } => write!(f, "bundled element set {}", version),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedElementSet {
    pub element_set: ElementSet,
    pub provenance: Provenance,
}

impl ResolvedElementSet {
    pub fn is_degraded(&self) -> bool {
        self.provenance.is_degraded()
    }
}

type Resolution = Result<ResolvedElementSet, ElementsError>;
type PendingResolution = Shared<BoxFuture<'static, Resolution>>;

struct Inner {
    sources: Vec<Arc<dyn ElementSource>>,
    clock: Arc<dyn Clock>,
    max_age: Duration,
    bundled: HashMap<u32, BundledElementSet>,
    entries: RwLock<HashMap<u32, CachedElementSet>>,
    in_flight: Mutex<HashMap<u32, PendingResolution>>,
}

/// Element sets per NORAD id, refreshed through an ordered list of sources
/// with the last good fetch and a bundled set as fallbacks.
///
/// Cloning is cheap and clones share the same entries. Concurrent requests
/// for one satellite share a single resolution.
#[derive(Clone)]
pub struct ElementCache {
    inner: Arc<Inner>,
}

pub struct ElementCacheBuilder {
    sources: Vec<Arc<dyn ElementSource>>,
    clock: Arc<dyn Clock>,
    max_age: Duration,
    bundled: HashMap<u32, BundledElementSet>,
}

impl ElementCacheBuilder {
    /// Sources are tried in the order they are added.
    pub fn source(mut self, source: Arc<dyn ElementSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn bundled(mut self, bundled: BundledElementSet) -> Self {
        match bundled.element_set.norad_id() {
            Some(norad_id) => {
                self.bundled.insert(norad_id, bundled);
            }
            None => log::warn!(
                "ignoring bundled element set {} without a catalog number",
                bundled.version
            ),
        }
        self
    }

    pub fn build(self) -> ElementCache {
        ElementCache {
            inner: Arc::new(Inner {
                sources: self.sources,
                clock: self.clock,
                max_age: self.max_age,
                bundled: self.bundled,
                entries: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl ElementCache {
    pub fn builder(clock: Arc<dyn Clock>) -> ElementCacheBuilder {
        ElementCacheBuilder {
            sources: Vec::new(),
            clock,
            max_age: DEFAULT_MAX_AGE,
            bundled: HashMap::new(),
        }
    }

    /// Best available element set for `norad_id`. Fails only when every
    /// source failed, nothing fresh is cached and no bundled set exists; the
    /// error is then the one reported by the last source.
    pub async fn get_element_set(&self, norad_id: u32) -> Resolution {
        let pending = {
            let mut in_flight = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            match in_flight.get(&norad_id) {
                Some(pending) => {
                    log::debug!("joining in-flight element fetch for NORAD {}", norad_id);
                    pending.clone()
                }
                None => {
                    // The resolution runs as its own task so it completes
                    // even when every waiter is dropped.
                    let inner = self.inner.clone();
                    let task = tokio::spawn(async move {
                        let resolution = inner.resolve(norad_id).await;
                        inner
                            .in_flight
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .remove(&norad_id);
                        resolution
                    });
                    let pending = async move {
                        task.await.unwrap_or_else(|e| {
                            Err(ElementsError::Network(format!(
                                "element resolution task failed: {}",
                                e
                            )))
                        })
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(norad_id, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    #[cfg(test)]
    pub fn cached(&self, norad_id: u32) -> Option<CachedElementSet> {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&norad_id)
            .cloned()
    }
}

impl Inner {
    async fn resolve(&self, norad_id: u32) -> Resolution {
        let mut last_error = ElementsError::NoSources;

        for source in &self.sources {
            match source.fetch(norad_id).await {
                Ok(element_set) => {
                    log::info!(
                        "fetched element set for NORAD {} from {}",
                        norad_id,
                        source.name()
                    );
                    self.store(norad_id, element_set.clone());
                    return Ok(ResolvedElementSet {
                        element_set,
                        provenance: Provenance::Live {
                            source: source.name().to_string(),
                        },
                    });
                }
                Err(e) => {
                    log::warn!(
                        "element source {} failed for NORAD {}: {}",
                        source.name(),
                        norad_id,
                        e
                    );
                    last_error = e;
                }
            }
        }

        let now = self.clock.now();
        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&norad_id)
            .cloned();

        if let Some(cached) = cached.filter(|c| c.is_fresh(now, self.max_age)) {
            let age = cached.age(now);
            log::warn!(
                "using cached element set for NORAD {} ({} s old)",
                norad_id,
                age.num_seconds()
            );
            return Ok(ResolvedElementSet {
                element_set: cached.value,
                provenance: Provenance::Cached {
                    fetched_at: cached.fetched_at,
                    age_seconds: age.num_seconds(),
                },
            });
        }

        if let Some(bundled) = self.bundled.get(&norad_id) {
            log::warn!(
                "using bundled element set {} for NORAD {}",
                bundled.version,
                norad_id
            );
            return Ok(ResolvedElementSet {
                element_set: bundled.element_set.clone(),
                provenance: Provenance::Bundled {
                    version: bundled.version.clone(),
                },
            });
        }

        Err(last_error)
    }

    fn store(&self, norad_id: u32, value: ElementSet) {
        let fetched_at = self.clock.now();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(norad_id, CachedElementSet { value, fetched_at });
    }
}
