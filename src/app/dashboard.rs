// MyRent - app/dashboard.rs
//
// Dashboard statistics over an injected store handle.

use crate::core::analytics::{aggregate, AnalyticsConfig, DashboardStats};
use crate::core::store::PropertyStore;
use crate::util::error::StoreError;

/// Stateless aggregator: every `compute` is a fresh full scan.
pub struct AnalyticsAggregator<'s, S: PropertyStore + ?Sized> {
    store: &'s S,
    config: AnalyticsConfig,
}

impl<'s, S: PropertyStore + ?Sized> AnalyticsAggregator<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            config: AnalyticsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn compute(&self) -> Result<DashboardStats, StoreError> {
        let records = self.store.scan_all()?;
        let stats = aggregate(&records, &self.config);
        tracing::debug!(
            total = stats.total,
            regions = stats.cost_by_region.len(),
            scatter_points = stats.scatter.len(),
            insights = stats.insights.len(),
            "Dashboard statistics computed"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::PropertyRecord;
    use crate::core::store::MemoryStore;
    use chrono::Utc;

    #[test]
    fn test_compute_reflects_store_contents() {
        let mut store = MemoryStore::new();
        assert_eq!(AnalyticsAggregator::new(&store).compute().unwrap().total, 0);

        let mut rec = PropertyRecord::blank(Utc::now());
        rec.region = "Cruzeiro".to_string();
        rec.rent_value = 1200.0;
        rec.condo_fee = 800.0;
        rec.recompute_total();
        store.bulk_insert(vec![rec]).unwrap();

        let stats = AnalyticsAggregator::new(&store).compute().unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.avg_cost, 2000.0);
        assert_eq!(stats.insights.len(), 1);

        let lenient = AnalyticsAggregator::new(&store)
            .with_config(AnalyticsConfig {
                condo_warning_share: 0.5,
            })
            .compute()
            .unwrap();
        assert!(lenient.insights.is_empty());
    }
}
