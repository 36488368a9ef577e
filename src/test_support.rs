use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Notify;

use crate::clock::Clock;
use crate::elements::{ElementSet, ElementSource, ElementsError};

/// ISS, epoch 2008-09-20 12:25:40 UTC
pub const ISS_LINE1: &str =
    "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

/// Near-equatorial geostationary orbit, epoch 2008-09-20 12:00:00 UTC
pub const GEO_LINE1: &str =
    "1 28884U 05041A   08264.50000000 -.00000110  00000-0  00000+0 0  9997";
pub const GEO_LINE2: &str =
    "2 28884   0.0500 270.0000 0002000 100.0000 260.0000  1.00270000 11009";

pub fn iss_2008() -> ElementSet {
    ElementSet {
        name: None,
        line1: ISS_LINE1.to_string(),
        line2: ISS_LINE2.to_string(),
    }
}

pub fn geostationary() -> ElementSet {
    ElementSet {
        name: None,
        line1: GEO_LINE1.to_string(),
        line2: GEO_LINE2.to_string(),
    }
}

/// A few minutes after the ISS fixture epoch.
pub fn iss_2008_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2008, 9, 20, 12, 30, 0).unwrap()
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Replays the scripted results in order, repeating the last one.
pub struct ScriptedSource {
    name: String,
    script: Mutex<VecDeque<Result<ElementSet, ElementsError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(name: &str, script: Vec<Result<ElementSet, ElementsError>>) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ElementSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _norad_id: u32) -> Result<ElementSet, ElementsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap_or(Err(ElementsError::Parse))
        }
    }
}

/// Blocks every fetch until the gate is notified.
pub struct GatedSource {
    element_set: ElementSet,
    gate: Arc<Notify>,
    pub calls: AtomicUsize,
}

impl GatedSource {
    pub fn new(element_set: ElementSet, gate: Arc<Notify>) -> Self {
        Self {
            element_set,
            gate,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ElementSource for GatedSource {
    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch(&self, _norad_id: u32) -> Result<ElementSet, ElementsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.element_set.clone())
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
