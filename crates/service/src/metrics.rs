//! Metrics for the preconfirmation ordering service.

/// Container for the metric identifiers the service produces.
#[derive(Debug)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of events delivered to the execution
    /// engine, labeled by event kind.
    pub const EVENTS_DELIVERED: &'static str = "preconf_events_delivered";

    /// Identifier for the gauge tracking the number of buffered events
    /// awaiting a predecessor.
    pub const EVENTS_BUFFERED: &'static str = "preconf_events_buffered";

    /// Identifier for the counter of already-delivered duplicates dropped.
    pub const DUPLICATE_EVENTS: &'static str = "preconf_duplicate_events";

    /// Identifier for the counter of events dropped because their block was
    /// already sealed and retired.
    pub const STALE_EVENTS: &'static str = "preconf_stale_events";

    /// Identifier for the counter of delivery calls the engine rejected.
    pub const DELIVERY_FAILURES: &'static str = "preconf_delivery_failures";

    /// Describes all metrics the preconfirmation service may produce.
    ///
    /// Call once during application startup if metric descriptions are
    /// desired for observers like Prometheus.
    pub fn init() {
        metrics::describe_counter!(
            Self::EVENTS_DELIVERED,
            metrics::Unit::Count,
            "Events delivered to the execution engine, labeled by kind"
        );
        metrics::describe_gauge!(
            Self::EVENTS_BUFFERED,
            metrics::Unit::Count,
            "Buffered events awaiting delivery of a predecessor"
        );
        metrics::describe_counter!(
            Self::DUPLICATE_EVENTS,
            metrics::Unit::Count,
            "Already-delivered events dropped on resubmission"
        );
        metrics::describe_counter!(
            Self::STALE_EVENTS,
            metrics::Unit::Count,
            "Events dropped because their block was already sealed"
        );
        metrics::describe_counter!(
            Self::DELIVERY_FAILURES,
            metrics::Unit::Count,
            "Delivery calls rejected by the execution engine"
        );
    }
}
