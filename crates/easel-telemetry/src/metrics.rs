//! Metric names and recording helpers for image operations

use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram};

/// Wall-clock time of one operation, validation through artifact write
pub const IMAGE_OPERATION_DURATION: &str = "image.operation.duration";
/// Operations completed, by outcome
pub const IMAGE_OPERATION_COUNT: &str = "image.operation.count";

/// Instruments shared by every operation call
#[derive(Clone)]
pub struct OperationMetrics {
    duration: Histogram<f64>,
    count: Counter<u64>,
}

impl OperationMetrics {
    /// Create the instruments on the global meter
    pub fn new() -> Self {
        let meter = opentelemetry::global::meter("easel");
        Self {
            duration: meter
                .f64_histogram(IMAGE_OPERATION_DURATION)
                .with_unit("s")
                .with_description("Duration of image operations")
                .build(),
            count: meter
                .u64_counter(IMAGE_OPERATION_COUNT)
                .with_description("Number of image operations")
                .build(),
        }
    }

    /// Record one finished operation
    ///
    /// `error_kind` is attached only for failures.
    pub fn record(&self, operation: &'static str, start: Instant, error_kind: Option<&'static str>) {
        let mut attributes = vec![
            KeyValue::new("operation", operation),
            KeyValue::new("status", if error_kind.is_some() { "error" } else { "success" }),
        ];
        if let Some(kind) = error_kind {
            attributes.push(KeyValue::new("error_kind", kind));
        }

        self.duration.record(start.elapsed().as_secs_f64(), &attributes);
        self.count.add(1, &attributes);
    }
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
