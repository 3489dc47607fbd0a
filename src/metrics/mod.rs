use prometheus::{
    Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::error::{AudexError, Result};
use crate::models::SearchMode;

/// Prometheus metrics for a catalog
#[derive(Clone)]
pub struct CatalogMetrics {
    // Counters
    pub records_added: Counter,
    pub records_rejected: Counter,
    pub records_removed: Counter,
    pub index_rebuilds: Counter,
    pub searches_total: CounterVec,
    pub invalid_patterns: Counter,

    // Gauges
    pub total_records: Gauge,

    // Histograms
    pub search_latency: HistogramVec,

    registry: Arc<Registry>,
}

impl CatalogMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let records_added = Counter::with_opts(Opts::new(
            "audex_records_added_total",
            "Total number of records added to the catalog",
        ))?;
        registry.register(Box::new(records_added.clone()))?;

        let records_rejected = Counter::with_opts(Opts::new(
            "audex_records_rejected_total",
            "Total number of records rejected as duplicates",
        ))?;
        registry.register(Box::new(records_rejected.clone()))?;

        let records_removed = Counter::with_opts(Opts::new(
            "audex_records_removed_total",
            "Total number of records removed from the catalog",
        ))?;
        registry.register(Box::new(records_removed.clone()))?;

        let index_rebuilds = Counter::with_opts(Opts::new(
            "audex_index_rebuilds_total",
            "Total number of full index rebuilds",
        ))?;
        registry.register(Box::new(index_rebuilds.clone()))?;

        let searches_total = CounterVec::new(
            Opts::new("audex_searches_total", "Total number of searches by mode"),
            &["mode"],
        )?;
        registry.register(Box::new(searches_total.clone()))?;

        let invalid_patterns = Counter::with_opts(Opts::new(
            "audex_invalid_patterns_total",
            "Total number of regex searches with a pattern that failed to compile",
        ))?;
        registry.register(Box::new(invalid_patterns.clone()))?;

        let total_records = Gauge::with_opts(Opts::new(
            "audex_total_records",
            "Current number of records in the catalog",
        ))?;
        registry.register(Box::new(total_records.clone()))?;

        let search_latency = HistogramVec::new(
            HistogramOpts::new("audex_search_latency_seconds", "Search latency by mode")
                .buckets(vec![
                    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
                ]),
            &["mode"],
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        Ok(Self {
            records_added,
            records_rejected,
            records_removed,
            index_rebuilds,
            searches_total,
            invalid_patterns,
            total_records,
            search_latency,
            registry: Arc::new(registry),
        })
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn record_added(&self, total: usize) {
        self.records_added.inc();
        self.set_total_records(total);
    }

    pub fn record_rejected(&self) {
        self.records_rejected.inc();
    }

    pub fn record_removed(&self, count: usize, total: usize) {
        self.records_removed.inc_by(count as f64);
        self.set_total_records(total);
    }

    pub fn record_rebuild(&self) {
        self.index_rebuilds.inc();
    }

    /// Record a search operation
    pub fn record_search(&self, mode: SearchMode, duration_secs: f64) {
        self.searches_total.with_label_values(&[mode.name()]).inc();
        self.search_latency
            .with_label_values(&[mode.name()])
            .observe(duration_secs);
    }

    pub fn record_invalid_pattern(&self) {
        self.invalid_patterns.inc();
    }

    pub fn set_total_records(&self, count: usize) {
        self.total_records.set(count as f64);
    }

    /// Render every registered metric in the Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| AudexError::Internal(e.to_string()))
    }
}

impl Default for CatalogMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
