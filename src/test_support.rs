//! Fixtures and fake price sources shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::models::{PriceQuote, Recipe};
use crate::source::{PriceSource, SourceError};
use crate::state::AppState;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn quote(key: &str, price_per_kg: Option<f64>, unit_price: Option<f64>) -> PriceQuote {
    PriceQuote {
        source_key: key.to_string(),
        product_name: None,
        price_per_kg,
        unit_price,
        currency: "MXN".to_string(),
        raw_unit: None,
    }
}

pub fn quote_per_kg(key: &str, price: f64) -> PriceQuote {
    quote(key, Some(price), None)
}

/// Shelf prices for the reference recipe, keyed by product URL.
pub fn reference_quote_for(key: &str) -> PriceQuote {
    let slug = key.rsplit('/').next().unwrap_or(key);
    match slug {
        "pulpa-de-res-picada-357825" => quote(key, Some(189.0), None),
        "tocineta-413218" => quote(key, Some(159.0), None),
        "jamon-de-pierna-horneado-428669" => quote(key, Some(229.0), None),
        "salchicha-para-asar-238828" => quote(key, None, Some(89.5)),
        "chorizo-319544" => quote(key, None, Some(18.9)),
        "cebolla-blanca-924" => quote(key, Some(30.0), None),
        "cerveza-six-pack-lata-323328" => quote(key, None, Some(110.0)),
        "nectar-mixto-de-450697" => quote(key, None, Some(27.5)),
        _ => quote(key, Some(1.0), None),
    }
}

/// Quotes for [`Recipe::reference`], in declaration order.
pub fn reference_quotes() -> Vec<PriceQuote> {
    Recipe::reference()
        .ingredients
        .iter()
        .map(|i| reference_quote_for(&i.source_key))
        .collect()
}

pub fn test_state(source: Arc<dyn PriceSource>) -> AppState {
    AppState::new(&Config::default(), Recipe::reference(), source)
}

// ─── Fakes ────────────────────────────────────────────────────────────────────

/// Answers every lookup successfully, but only after `delay`.
pub struct SlowSource {
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl SlowSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PriceSource for SlowSource {
    async fn lookup(&self, source_key: &str) -> Result<PriceQuote, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(quote_per_kg(source_key, 1.0))
    }
}

/// Records which keys were looked up.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn record(&self, key: &str) {
        self.0.lock().unwrap().push(key.to_string());
    }

    pub fn count(&self, key: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|k| *k == key).count()
    }
}

/// Reference prices with per-key latency and failure injection.
#[derive(Default)]
pub struct ScriptedSource {
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    log: CallLog,
}

impl ScriptedSource {
    pub fn reference() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn lookup(&self, source_key: &str) -> Result<PriceQuote, SourceError> {
        self.log.record(source_key);
        if let Some(delay) = self.delays.get(source_key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(source_key) {
            return Err(SourceError::Status(500));
        }
        Ok(reference_quote_for(source_key))
    }
}
