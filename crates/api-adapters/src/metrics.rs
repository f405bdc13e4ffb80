//! Prometheus counters for the board API.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub method: String,
    pub route: String,
    pub status: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EntityLabels {
    pub entity: String,
}

#[derive(Debug)]
pub struct BoardMetrics {
    registry: Registry,
    requests: Family<RequestLabels, Counter>,
    credential_mismatches: Family<EntityLabels, Counter>,
}

impl BoardMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let requests = Family::<RequestLabels, Counter>::default();
        let credential_mismatches = Family::<EntityLabels, Counter>::default();

        registry.register(
            "board_requests",
            "Board API requests by method, route and status",
            requests.clone(),
        );
        registry.register(
            "board_credential_mismatches",
            "Delete attempts rejected for an incorrect password",
            credential_mismatches.clone(),
        );

        Self {
            registry,
            requests,
            credential_mismatches,
        }
    }

    pub fn observe_request(&self, method: &str, route: &str, status: u16) {
        self.requests
            .get_or_create(&RequestLabels {
                method: method.to_string(),
                route: route.to_string(),
                status: status.to_string(),
            })
            .inc();
    }

    /// `entity` is "thread" or "reply".
    pub fn observe_credential_mismatch(&self, entity: &str) {
        self.credential_mismatches
            .get_or_create(&EntityLabels {
                entity: entity.to_string(),
            })
            .inc();
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

impl Default for BoardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = BoardMetrics::new();
        metrics.observe_request("GET", "/api/threads/{board}", 200);
        metrics.observe_request("GET", "/api/threads/{board}", 200);
        metrics.observe_credential_mismatch("reply");

        let text = metrics.render().unwrap();
        assert!(text.contains("board_requests_total"));
        assert!(text.contains("status=\"200\""));
        assert!(text.contains("board_credential_mismatches_total{entity=\"reply\"} 1"));
        assert!(text.ends_with("# EOF\n"));
    }
}
