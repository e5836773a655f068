use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Cumulative time spent in one pipeline stage.
#[derive(Default)]
struct StageTiming {
    total_us: AtomicU64,
    count: AtomicUsize,
}

impl StageTiming {
    fn record(&self, duration: Duration) {
        self.total_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn avg_ms(&self) -> f64 {
        let total = self.total_us.load(Ordering::Relaxed) as f64;
        let cnt = self.count.load(Ordering::Relaxed) as f64;
        if cnt > 0.0 {
            total / cnt / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

#[derive(Default)]
pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing
    load: StageTiming,
    extract: StageTiming,
    classify: StageTiming,
    summarize: StageTiming,

    // Counts
    documents_loaded: AtomicUsize,
    entities_extracted: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_load(&self, duration: Duration) {
        self.load.record(duration);
        self.documents_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extract(&self, duration: Duration, entities: usize) {
        self.extract.record(duration);
        self.entities_extracted.fetch_add(entities, Ordering::Relaxed);
    }

    pub fn record_classify(&self, duration: Duration) {
        self.classify.record(duration);
    }

    pub fn record_summarize(&self, duration: Duration) {
        self.summarize.record(duration);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            avg_load_time_ms: self.load.avg_ms(),
            avg_extract_time_ms: self.extract.avg_ms(),
            avg_classify_time_ms: self.classify.avg_ms(),
            avg_summarize_time_ms: self.summarize.avg_ms(),
            documents_loaded: self.documents_loaded.load(Ordering::Relaxed),
            entities_extracted: self.entities_extracted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub avg_load_time_ms: f64,
    pub avg_extract_time_ms: f64,
    pub avg_classify_time_ms: f64,
    pub avg_summarize_time_ms: f64,
    pub documents_loaded: usize,
    pub entities_extracted: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
