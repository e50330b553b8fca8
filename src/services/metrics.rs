use axum::http::StatusCode;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

pub struct MetricsService {
    registry: Registry,
    http_requests: IntCounterVec,
    request_duration: HistogramVec,
    snapshots_saved: IntCounter,
}

impl MetricsService {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests by method and status class"),
            &["method", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency"),
            &["method"],
        )?;
        let snapshots_saved = IntCounter::new(
            "nutrient_snapshots_saved_total",
            "Daily nutrient snapshots written",
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(snapshots_saved.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            request_duration,
            snapshots_saved,
        })
    }

    pub fn record_request(&self, method: &str, status: StatusCode, duration: Duration) {
        let class = format!("{}xx", status.as_u16() / 100);
        self.http_requests.with_label_values(&[method, &class]).inc();
        self.request_duration
            .with_label_values(&[method])
            .observe(duration.as_secs_f64());
    }

    pub fn record_snapshot_saved(&self) {
        self.snapshots_saved.inc();
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_metrics() {
        let metrics = MetricsService::new().unwrap();
        metrics.record_request("GET", StatusCode::OK, Duration::from_millis(5));
        metrics.record_request("POST", StatusCode::BAD_REQUEST, Duration::from_millis(5));
        metrics.record_snapshot_saved();

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"http_requests_total{method="GET",status="2xx"} 1"#));
        assert!(text.contains(r#"http_requests_total{method="POST",status="4xx"} 1"#));
        assert!(text.contains("nutrient_snapshots_saved_total 1"));
    }
}
