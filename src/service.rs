use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use sgp4::Elements;
use thiserror::Error;

use crate::clock::Clock;
use crate::config::{to_chrono, Config, ConfigError};
use crate::elements::{
    BodyFormat, ElementCache, ElementsError, HttpSource, Provenance, ResolvedElementSet,
};
use crate::predict::{self, Observer, OrbitInfo, PassSearch, PassWindow, PredictError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("orbital data unavailable: {0}")]
    Elements(#[from] ElementsError),
    #[error("{0}")]
    Predict(#[from] PredictError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A predicted pass and the element set it was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct NextPass {
    pub window: PassWindow,
    pub provenance: Provenance,
}

impl NextPass {
    pub fn is_degraded(&self) -> bool {
        self.provenance.is_degraded()
    }
}

/// Pass prediction for one satellite, backed by a shared element cache.
#[derive(Clone)]
pub struct PassService {
    cache: ElementCache,
    clock: Arc<dyn Clock>,
    norad_id: u32,
    search: PassSearch,
    launch_date: Option<NaiveDate>,
    name: Option<String>,
}

impl PassService {
    pub fn new(
        cache: ElementCache,
        clock: Arc<dyn Clock>,
        norad_id: u32,
        search: PassSearch,
    ) -> Self {
        Self {
            cache,
            clock,
            norad_id,
            search,
            launch_date: None,
            name: None,
        }
    }

    pub fn with_launch_date(mut self, launch_date: Option<NaiveDate>) -> Self {
        self.launch_date = launch_date;
        self
    }

    /// Name reported for element sets that arrive without a name line.
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Wire the HTTP sources, fallback set and scan parameters described by
    /// `config`.
    pub fn from_config(
        config: &Config,
        client: Client,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServiceError> {
        let elements = &config.elements;
        let mut builder = ElementCache::builder(clock.clone())
            .max_age(to_chrono("elements.max_age", elements.max_age)?)
            .source(Arc::new(
                HttpSource::new(
                    "primary",
                    elements.primary_url.clone(),
                    BodyFormat::JsonOrText,
                    client.clone(),
                )
                .with_timeout(elements.request_timeout),
            ));

        if let Some(url) = &elements.secondary_url {
            builder = builder.source(Arc::new(
                HttpSource::new("secondary", url.clone(), BodyFormat::Text, client)
                    .with_timeout(elements.request_timeout),
            ));
        }

        if let Some(bundled) = config.bundled()? {
            builder = builder.bundled(bundled);
        }

        Ok(Self::new(
            builder.build(),
            clock,
            config.satellite.norad_id,
            config.pass_search()?,
        )
        .with_launch_date(config.launch_date())
        .with_name(config.satellite.name.clone()))
    }

    pub fn norad_id(&self) -> u32 {
        self.norad_id
    }

    pub async fn next_pass(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
    ) -> Result<NextPass, ServiceError> {
        self.next_pass_for(Observer::new(latitude_deg, longitude_deg)).await
    }

    pub async fn next_pass_for(&self, observer: Observer) -> Result<NextPass, ServiceError> {
        observer.validate()?;

        let resolved = self.cache.get_element_set(self.norad_id).await?;
        if resolved.is_degraded() {
            log::warn!("Predicting with {}", resolved.provenance);
        }

        let window = predict::next_pass(
            &resolved.element_set,
            &observer,
            self.clock.now(),
            &self.search,
        )?;

        log::debug!(
            "Next pass of NORAD {} over ({:.4}, {:.4}): rise {} for {} s",
            self.norad_id,
            observer.latitude_deg,
            observer.longitude_deg,
            window.rise_time,
            window.duration_seconds
        );

        Ok(NextPass {
            window,
            provenance: resolved.provenance,
        })
    }

    pub async fn element_set(&self) -> Result<ResolvedElementSet, ServiceError> {
        let mut resolved = self.cache.get_element_set(self.norad_id).await?;
        if resolved.element_set.name.is_none() {
            resolved.element_set.name = self.name.clone();
        }
        Ok(resolved)
    }

    pub async fn orbit_info(&self) -> Result<(OrbitInfo, Provenance), ServiceError> {
        let resolved = self.element_set().await?;
        let elements: Elements = resolved
            .element_set
            .to_elements()
            .map_err(|e| PredictError::InvalidElements(e.to_string()))?;

        let info = predict::orbit_info(&elements, self.clock.now(), self.launch_date);
        Ok((info, resolved.provenance))
    }
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Json, Router};
    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use crate::clock::FixedClock;
    use crate::elements::{BundledElementSet, ElementSource};
    use crate::test_support::{
        geostationary, iss_2008, iss_2008_epoch, serve, ScriptedSource, ISS_LINE1, ISS_LINE2,
    };

    const LONDON: (f64, f64) = (51.5074, -0.1278);

    fn service_with(
        source: Arc<ScriptedSource>,
        bundled: Option<BundledElementSet>,
    ) -> PassService {
        let clock = Arc::new(FixedClock(iss_2008_epoch()));
        let mut builder =
            ElementCache::builder(clock.clone()).source(source as Arc<dyn ElementSource>);
        if let Some(bundled) = bundled {
            builder = builder.bundled(bundled);
        }
        PassService::new(builder.build(), clock, 25544, PassSearch::default())
    }

    #[tokio::test]
    async fn predicts_from_live_elements() {
        let source = Arc::new(ScriptedSource::new("primary", vec![Ok(iss_2008())]));
        let service = service_with(source.clone(), None);

        let pass = service.next_pass(LONDON.0, LONDON.1).await.unwrap();
        assert_eq!(
            pass.provenance,
            Provenance::Live {
                source: "primary".into()
            }
        );
        assert!(!pass.is_degraded());
        assert!(pass.window.rise_time > iss_2008_epoch().timestamp());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn validates_observer_before_fetching() {
        let source = Arc::new(ScriptedSource::new("primary", vec![Ok(iss_2008())]));
        let service = service_with(source.clone(), None);

        let err = service.next_pass(f64::NAN, 0.0).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Predict(PredictError::InvalidObserver(_))
        ));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_bundled_elements() {
        let source = Arc::new(ScriptedSource::new(
            "primary",
            vec![Err(ElementsError::Status(503))],
        ));
        let bundled = BundledElementSet {
            version: "test-2008".into(),
            element_set: iss_2008(),
        };
        let service = service_with(source, Some(bundled));

        let pass = service.next_pass(LONDON.0, LONDON.1).await.unwrap();
        assert!(pass.is_degraded());
        assert_eq!(
            pass.provenance,
            Provenance::Bundled {
                version: "test-2008".into()
            }
        );
    }

    #[tokio::test]
    async fn reports_unavailable_elements() {
        let source = Arc::new(ScriptedSource::new(
            "primary",
            vec![Err(ElementsError::Timeout(std::time::Duration::from_secs(8)))],
        ));
        let service = service_with(source, None);

        let err = service.next_pass(LONDON.0, LONDON.1).await.unwrap_err();
        assert!(matches!(err, ServiceError::Elements(ElementsError::Timeout(_))));
        assert!(err.to_string().starts_with("orbital data unavailable"));
    }

    #[tokio::test]
    async fn no_pass_is_surfaced_not_retried() {
        let source = Arc::new(ScriptedSource::new("primary", vec![Ok(geostationary())]));
        let clock = Arc::new(FixedClock(iss_2008_epoch()));
        let cache = ElementCache::builder(clock.clone())
            .source(source.clone() as Arc<dyn ElementSource>)
            .build();
        let service = PassService::new(cache, clock, 28884, PassSearch::default());

        let err = service.next_pass(89.0, 0.0).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Predict(PredictError::NoPass { .. })
        ));
        assert!(err.to_string().contains("try again shortly"));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn summarises_orbit() {
        let source = Arc::new(ScriptedSource::new("primary", vec![Ok(iss_2008())]));
        let service =
            service_with(source, None).with_launch_date(NaiveDate::from_ymd_opt(1998, 11, 20));

        let (info, provenance) = service.orbit_info().await.unwrap();
        assert_eq!(info.norad_id, 25544);
        assert_eq!(info.name, None);
        assert_eq!(info.orbit_number, Some(56353));
        assert_eq!(info.updated_at, iss_2008_epoch());
        assert!(!provenance.is_degraded());
    }

    #[tokio::test]
    async fn configured_name_fills_in_for_unnamed_elements() {
        let source = Arc::new(ScriptedSource::new("primary", vec![Ok(iss_2008())]));
        let service = service_with(source, None).with_name(Some("Space Station".into()));

        let resolved = service.element_set().await.unwrap();
        assert_eq!(resolved.element_set.name.as_deref(), Some("Space Station"));

        let (info, _) = service.orbit_info().await.unwrap();
        assert_eq!(info.name.as_deref(), Some("Space Station"));

        let mut named = iss_2008();
        named.name = Some("ISS (ZARYA)".into());
        let source = Arc::new(ScriptedSource::new("primary", vec![Ok(named)]));
        let service = service_with(source, None).with_name(Some("Space Station".into()));
        let resolved = service.element_set().await.unwrap();
        assert_eq!(resolved.element_set.name.as_deref(), Some("ISS (ZARYA)"));
    }

    #[tokio::test]
    async fn wires_http_sources_from_config() {
        let app = Router::new()
            .route(
                "/tles/25544",
                get(|| async {
                    Json(json!({ "header": "ISS (ZARYA)", "line1": ISS_LINE1, "line2": ISS_LINE2 }))
                }),
            )
            .route(
                "/text/25544",
                get(|| async { format!("{ISS_LINE1}\n{ISS_LINE2}\n") }),
            );
        let base = serve(app).await;

        let mut config = Config::default();
        config.elements.primary_url = format!("{base}/missing/{{norad_id}}");
        config.elements.secondary_url = Some(format!("{base}/text/{{norad_id}}"));
        config.predict.window = std::time::Duration::from_secs(6 * 3600);

        let clock = Arc::new(FixedClock(iss_2008_epoch()));
        let service = PassService::from_config(&config, Client::new(), clock).unwrap();
        assert_eq!(service.norad_id(), 25544);
        assert_eq!(service.search.window(), Duration::hours(6));

        let resolved = service.element_set().await.unwrap();
        assert_eq!(
            resolved.provenance,
            Provenance::Live {
                source: "secondary".into()
            }
        );
        assert_eq!(resolved.element_set.line1, ISS_LINE1);

        config.elements.primary_url = format!("{base}/tles/{{norad_id}}");
        let clock = Arc::new(FixedClock(iss_2008_epoch()));
        let service = PassService::from_config(&config, Client::new(), clock).unwrap();
        let resolved = service.element_set().await.unwrap();
        assert_eq!(
            resolved.provenance,
            Provenance::Live {
                source: "primary".into()
            }
        );
        assert_eq!(resolved.element_set.name.as_deref(), Some("ISS (ZARYA)"));
    }

    #[tokio::test]
    async fn rejects_invalid_config() {
        let mut config = Config::default();
        config.predict.step = std::time::Duration::ZERO;
        let clock = Arc::new(FixedClock(iss_2008_epoch()));

        let err = PassService::from_config(&config, Client::new(), clock).err().unwrap();
        assert!(matches!(err, ServiceError::Config(ConfigError::Invalid { .. })));
    }
}
