// MyRent - core/analytics.rs
//
// Portfolio statistics derived from the full record set.
//
// Pure read projection: recomputed from scratch on every call, no cached
// or persisted derived state. Every accumulator below is filled in a
// single pass over the records; the radar comparison is a second pass
// over the per-region accumulators.

use crate::core::model::{PropertyRecord, Status};
use crate::util::constants::{
    DEFAULT_CONDO_WARNING_SHARE, RADAR_SCALE, REGION_NOT_INFORMED, REGION_OTHER,
};
use serde::Serialize;
use std::collections::HashMap;

// =============================================================================
// Configuration
// =============================================================================

/// Tunables for insight derivation.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    /// Condo share of total cost above which a warning insight fires.
    pub condo_warning_share: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            condo_warning_share: DEFAULT_CONDO_WARNING_SHARE,
        }
    }
}

// =============================================================================
// Output shapes
// =============================================================================

/// Everything the dashboard plots, in chart-ready form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub totals: CostTotals,
    pub avg_cost: f64,
    pub visited_count: usize,
    pub status_counts: Vec<StatusCount>,
    /// Portfolio-wide average cost split; empty when there are no records.
    pub cost_composition: Vec<CostBreakdown>,
    pub region_counts: Vec<RegionCount>,
    pub scatter: Vec<ScatterPoint>,
    pub cost_by_region: Vec<CostBreakdown>,
    pub radar: Vec<RadarAxisData>,
    pub insights: Vec<Insight>,
}

/// Sums across all records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostTotals {
    pub rent: f64,
    pub condo: f64,
    pub iptu: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
}

/// Average rent/condo/iptu for one label (a region, or "Média").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub label: String,
    pub rent: f64,
    pub condo: f64,
    pub iptu: f64,
}

/// One record on the area × price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub area: f64,
    pub price: f64,
    pub title: String,
    pub region: String,
    pub address: String,
}

/// The six fixed radar axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RadarAxis {
    Rent,
    Area,
    Elevator,
    Apartment,
    House,
    Metro,
}

impl RadarAxis {
    pub fn all() -> &'static [RadarAxis] {
        &[
            RadarAxis::Rent,
            RadarAxis::Area,
            RadarAxis::Elevator,
            RadarAxis::Apartment,
            RadarAxis::House,
            RadarAxis::Metro,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RadarAxis::Rent => "Aluguel (R$)",
            RadarAxis::Area => "Área (m²)",
            RadarAxis::Elevator => "Elevador (%)",
            RadarAxis::Apartment => "Apartamento (%)",
            RadarAxis::House => "Casa (%)",
            RadarAxis::Metro => "Metrô (%)",
        }
    }
}

/// One radar axis with every region's value on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxisData {
    pub axis: RadarAxis,
    pub label: &'static str,
    pub values: Vec<RadarValue>,
}

/// `normalized` is on the 0–100 plotting scale; `raw` is the per-region
/// average (a fraction for the rate axes) kept for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarValue {
    pub region: String,
    pub normalized: f64,
    pub raw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

// =============================================================================
// Accumulators
// =============================================================================

/// Running sums and attribute counters for one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionMetrics {
    pub rent: f64,
    pub condo: f64,
    pub iptu: f64,
    pub area: f64,
    pub count: usize,
    pub elevator: usize,
    pub apartment: usize,
    pub house: usize,
    pub metro: usize,
}

impl RegionMetrics {
    fn add(&mut self, record: &PropertyRecord) {
        self.rent += record.rent_value;
        self.condo += record.condo_fee;
        self.iptu += record.iptu;
        self.area += record.area;
        self.count += 1;

        let tags: Vec<String> = record.tags.iter().map(|t| t.to_lowercase()).collect();
        let has_tag = |wanted: &str| tags.iter().any(|t| t == wanted);
        let title = record.title.to_lowercase();

        if has_tag("elevador") {
            self.elevator += 1;
        }
        if has_tag("apartamento") || title.contains("apartamento") || title.contains("apto") {
            self.apartment += 1;
        }
        if has_tag("casa") || title.contains("casa") {
            self.house += 1;
        }
        if has_tag("metrô") || has_tag("metro") {
            self.metro += 1;
        }
    }

    fn average(&self, sum: f64) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            sum / self.count as f64
        }
    }

    fn rate(&self, hits: usize) -> f64 {
        self.average(hits as f64)
    }

    /// Per-region average on one radar axis.
    pub fn axis_value(&self, axis: RadarAxis) -> f64 {
        match axis {
            RadarAxis::Rent => self.average(self.rent),
            RadarAxis::Area => self.average(self.area),
            RadarAxis::Elevator => self.rate(self.elevator),
            RadarAxis::Apartment => self.rate(self.apartment),
            RadarAxis::House => self.rate(self.house),
            RadarAxis::Metro => self.rate(self.metro),
        }
    }
}

/// Insertion-ordered tally keyed by label.
#[derive(Debug)]
struct OrderedTally<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Clone + Eq + std::hash::Hash, V: Default> OrderedTally<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut V {
        let slot = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, V::default()));
                i
            }
        };
        &mut self.entries[slot].1
    }

    fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

fn region_or(record: &PropertyRecord, fallback: &str) -> String {
    if record.region.is_empty() {
        fallback.to_string()
    } else {
        record.region.clone()
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Compute the full dashboard over `records`.
pub fn aggregate(records: &[PropertyRecord], config: &AnalyticsConfig) -> DashboardStats {
    let total = records.len();
    let mut totals = CostTotals::default();
    let mut visited_count = 0;
    let mut statuses: OrderedTally<Status, usize> = OrderedTally::new();
    let mut regions: OrderedTally<String, usize> = OrderedTally::new();
    let mut metrics: OrderedTally<String, RegionMetrics> = OrderedTally::new();
    let mut scatter = Vec::new();

    for record in records {
        totals.rent += record.rent_value;
        totals.condo += record.condo_fee;
        totals.iptu += record.iptu;
        totals.total += record.total_cost;

        if record.status == Status::Visited {
            visited_count += 1;
        }
        *statuses.entry(record.status) += 1;
        *regions.entry(region_or(record, REGION_NOT_INFORMED)) += 1;
        metrics.entry(region_or(record, REGION_OTHER)).add(record);

        if record.area > 0.0 && record.total_cost > 0.0 {
            scatter.push(ScatterPoint {
                area: record.area,
                price: record.total_cost,
                title: record.title.clone(),
                region: region_or(record, REGION_OTHER),
                address: record.address.clone(),
            });
        }
    }

    let avg_cost = if total > 0 {
        totals.total / total as f64
    } else {
        0.0
    };

    let cost_composition = if total > 0 {
        let n = total as f64;
        vec![CostBreakdown {
            label: "Média".to_string(),
            rent: totals.rent / n,
            condo: totals.condo / n,
            iptu: totals.iptu / n,
        }]
    } else {
        Vec::new()
    };

    let metrics = metrics.into_entries();
    let cost_by_region = metrics
        .iter()
        .map(|(region, m)| CostBreakdown {
            label: region.clone(),
            rent: m.average(m.rent),
            condo: m.average(m.condo),
            iptu: m.average(m.iptu),
        })
        .collect();

    DashboardStats {
        total,
        totals,
        avg_cost,
        visited_count,
        status_counts: statuses
            .into_entries()
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        cost_composition,
        region_counts: regions
            .into_entries()
            .into_iter()
            .map(|(region, count)| RegionCount { region, count })
            .collect(),
        scatter,
        cost_by_region,
        radar: radar_comparison(&metrics),
        insights: derive_insights(total, &totals, config),
    }
}

/// Normalise each axis to 0–100 against its maximum across regions.
/// An axis whose maximum is 0 divides by 1, so every value on it is 0.
pub fn radar_comparison(metrics: &[(String, RegionMetrics)]) -> Vec<RadarAxisData> {
    RadarAxis::all()
        .iter()
        .map(|&axis| {
            let raw: Vec<f64> = metrics.iter().map(|(_, m)| m.axis_value(axis)).collect();
            let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let divisor = if max == 0.0 || !max.is_finite() {
                1.0
            } else {
                max
            };

            let values = metrics
                .iter()
                .zip(raw)
                .map(|((region, _), raw)| RadarValue {
                    region: region.clone(),
                    normalized: raw / divisor * RADAR_SCALE,
                    raw,
                })
                .collect();

            RadarAxisData {
                axis,
                label: axis.label(),
                values,
            }
        })
        .collect()
}

fn derive_insights(total: usize, totals: &CostTotals, config: &AnalyticsConfig) -> Vec<Insight> {
    let mut insights = Vec::new();

    if total > 0 && totals.total > 0.0 {
        let share = totals.condo / totals.total;
        if share > config.condo_warning_share {
            insights.push(Insight {
                kind: InsightKind::Warning,
                text: format!(
                    "Atenção: O condomínio representa {:.0}% do custo médio.",
                    share * 100.0
                ),
            });
        }
    }

    if total == 0 {
        insights.push(Insight {
            kind: InsightKind::Info,
            text: "Adicione imóveis para ver insights.".to_string(),
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(region: &str, rent: f64, condo: f64, iptu: f64) -> PropertyRecord {
        let mut rec = PropertyRecord::blank(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        rec.region = region.to_string();
        rec.rent_value = rent;
        rec.condo_fee = condo;
        rec.iptu = iptu;
        rec.recompute_total();
        rec
    }

    fn axis<'a>(stats: &'a DashboardStats, axis: RadarAxis) -> &'a RadarAxisData {
        stats.radar.iter().find(|a| a.axis == axis).unwrap()
    }

    #[test]
    fn test_empty_portfolio() {
        let stats = aggregate(&[], &AnalyticsConfig::default());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_cost, 0.0);
        assert!(stats.cost_composition.is_empty());
        assert!(stats.radar.iter().all(|a| a.values.is_empty()));
        assert_eq!(stats.insights.len(), 1);
        assert_eq!(stats.insights[0].kind, InsightKind::Info);
    }

    #[test]
    fn test_totals_and_averages() {
        let mut visited = record("Asa Norte", 2000.0, 500.0, 100.0);
        visited.status = Status::Visited;
        let records = vec![visited, record("Guará", 1000.0, 200.0, 0.0)];
        let stats = aggregate(&records, &AnalyticsConfig::default());

        assert_eq!(stats.total, 2);
        assert_eq!(stats.totals.total, 3800.0);
        assert_eq!(stats.avg_cost, 1900.0);
        assert_eq!(stats.visited_count, 1);
        assert_eq!(
            stats.status_counts,
            vec![
                StatusCount { status: Status::Visited, count: 1 },
                StatusCount { status: Status::Interested, count: 1 },
            ]
        );
        assert_eq!(stats.cost_composition[0].rent, 1500.0);
    }

    #[test]
    fn test_region_buckets() {
        let records = vec![
            record("", 1000.0, 0.0, 0.0),
            record("Lago Sul", 5000.0, 0.0, 0.0),
            record("", 800.0, 0.0, 0.0),
        ];
        let stats = aggregate(&records, &AnalyticsConfig::default());
        assert_eq!(
            stats.region_counts,
            vec![
                RegionCount { region: REGION_NOT_INFORMED.to_string(), count: 2 },
                RegionCount { region: "Lago Sul".to_string(), count: 1 },
            ]
        );
        assert_eq!(stats.cost_by_region[0].label, REGION_OTHER);
        assert_eq!(stats.cost_by_region[0].rent, 900.0);
    }

    #[test]
    fn test_scatter_excludes_zero_area_or_cost() {
        let mut sized = record("", 1500.0, 0.0, 0.0);
        sized.area = 60.0;
        let unsized_rec = record("Sudoeste", 1500.0, 0.0, 0.0);
        let mut free = record("Sudoeste", 0.0, 0.0, 0.0);
        free.area = 50.0;

        let stats = aggregate(&[sized, unsized_rec, free], &AnalyticsConfig::default());
        assert_eq!(stats.scatter.len(), 1);
        assert_eq!(stats.scatter[0].region, REGION_OTHER);
        assert_eq!(stats.scatter[0].price, 1500.0);
    }

    #[test]
    fn test_attribute_counters() {
        let mut apto = record("Asa Sul", 2000.0, 0.0, 0.0);
        apto.title = "Apto 2 quartos".to_string();
        apto.tags = vec!["Elevador".to_string(), "Metrô".to_string()];
        let mut casa = record("Asa Sul", 3000.0, 0.0, 0.0);
        casa.tags = vec!["Casa".to_string()];
        // Metro only counts as a tag, never from the title.
        let mut titled_metro = record("Asa Sul", 1000.0, 0.0, 0.0);
        titled_metro.title = "Kitnet perto do metrô".to_string();

        let stats = aggregate(&[apto, casa, titled_metro], &AnalyticsConfig::default());
        let rates = |a: RadarAxis| axis(&stats, a).values[0].raw;
        assert!((rates(RadarAxis::Elevator) - 1.0 / 3.0).abs() < 1e-9);
        assert!((rates(RadarAxis::Apartment) - 1.0 / 3.0).abs() < 1e-9);
        assert!((rates(RadarAxis::House) - 1.0 / 3.0).abs() < 1e-9);
        assert!((rates(RadarAxis::Metro) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_radar_rent_normalisation() {
        let records = vec![
            record("A", 2000.0, 0.0, 0.0),
            record("B", 1000.0, 0.0, 0.0),
        ];
        let stats = aggregate(&records, &AnalyticsConfig::default());
        let rent = axis(&stats, RadarAxis::Rent);
        assert_eq!(rent.label, "Aluguel (R$)");
        assert_eq!(rent.values[0].region, "A");
        assert_eq!(rent.values[0].normalized, 100.0);
        assert_eq!(rent.values[0].raw, 2000.0);
        assert_eq!(rent.values[1].normalized, 50.0);
        assert_eq!(rent.values[1].raw, 1000.0);
    }

    #[test]
    fn test_radar_all_zero_axis_is_zero_not_nan() {
        let records = vec![record("A", 1000.0, 0.0, 0.0), record("B", 500.0, 0.0, 0.0)];
        let stats = aggregate(&records, &AnalyticsConfig::default());
        for a in [RadarAxis::Area, RadarAxis::Elevator, RadarAxis::House] {
            for v in &axis(&stats, a).values {
                assert_eq!(v.normalized, 0.0);
                assert!(v.normalized.is_finite());
            }
        }
    }

    #[test]
    fn test_condo_share_insight_threshold() {
        // 310 / 1000 = 31% → fires
        let heavy = aggregate(&[record("A", 690.0, 310.0, 0.0)], &AnalyticsConfig::default());
        assert_eq!(heavy.insights.len(), 1);
        assert_eq!(heavy.insights[0].kind, InsightKind::Warning);
        assert_eq!(
            heavy.insights[0].text,
            "Atenção: O condomínio representa 31% do custo médio."
        );

        // exactly 30% → does not fire
        let edge = aggregate(&[record("A", 700.0, 300.0, 0.0)], &AnalyticsConfig::default());
        assert!(edge.insights.is_empty());

        // all-zero costs → no division, no insight
        let zero = aggregate(&[record("A", 0.0, 0.0, 0.0)], &AnalyticsConfig::default());
        assert!(zero.insights.is_empty());
    }

    #[test]
    fn test_custom_condo_threshold() {
        let config = AnalyticsConfig {
            condo_warning_share: 0.10,
        };
        let stats = aggregate(&[record("A", 800.0, 200.0, 0.0)], &config);
        assert_eq!(stats.insights[0].kind, InsightKind::Warning);
    }
}
