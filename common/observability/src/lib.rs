use prometheus::{Histogram, IntCounter, IntCounterVec, Registry};

#[derive(Clone)]
pub struct CirculationMetrics {
    pub registry: Registry,
    pub borrow_conflicts_total: IntCounterVec,
    pub inventory_overflow_total: IntCounter,
    pub overdue_scan_duration_seconds: Histogram,
    pub http_errors_total: IntCounterVec,
}

impl CirculationMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let borrow_conflicts_total = IntCounterVec::new(
            prometheus::Opts::new(
                "circulation_borrow_conflicts_total",
                "Borrow/return attempts rejected by a business rule",
            ),
            &["reason"],
        ).unwrap();
        let inventory_overflow_total = IntCounter::new(
            "circulation_inventory_overflow_total",
            "Returns that would have pushed available copies past the total",
        ).unwrap();
        let overdue_scan_duration_seconds = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "circulation_overdue_scan_duration_seconds",
                "Duration of an on-demand overdue scan",
            ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0])
        ).unwrap();
        let http_errors_total = IntCounterVec::new(
            prometheus::Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)",
            ),
            &["service", "code", "status"],
        ).unwrap();
        let _ = registry.register(Box::new(borrow_conflicts_total.clone()));
        let _ = registry.register(Box::new(inventory_overflow_total.clone()));
        let _ = registry.register(Box::new(overdue_scan_duration_seconds.clone()));
        let _ = registry.register(Box::new(http_errors_total.clone()));
        CirculationMetrics {
            registry,
            borrow_conflicts_total,
            inventory_overflow_total,
            overdue_scan_duration_seconds,
            http_errors_total,
        }
    }
}

impl Default for CirculationMetrics {
    fn default() -> Self { Self::new() }
}
