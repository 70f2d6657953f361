use crate::dataset::{Algorithm, Measurement, Metric};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Reduction applied to each (algorithm, n) partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFn {
    Average,
    Minimum,
}

impl AggFn {
    /// Label used in chart titles and output file names.
    pub fn label(&self) -> &'static str {
        match self {
            AggFn::Average => "Average",
            AggFn::Minimum => "Minimum",
        }
    }

    fn reduce(&self, values: &[f64]) -> f64 {
        match self {
            AggFn::Average => values.iter().sum::<f64>() / values.len() as f64,
            AggFn::Minimum => values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// The reduced metric for one (algorithm, n) partition.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub alg: Algorithm,
    pub n: u64,
    pub value: f64,
}

/// Sample variance of a metric over all rows sharing (n, k).
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceRow {
    pub n: u64,
    pub k: f64,
    pub variance: f64,
}

/// Group measurements by (algorithm, n) and reduce the chosen metric.
///
/// Output contains exactly one row per pair present in the input, in
/// (algorithm, n) order. Pairs with no rows are simply absent.
pub fn aggregate(rows: &[Measurement], metric: Metric, func: AggFn) -> Vec<AggregatedRow> {
    aggregate_values(
        rows.iter().map(|r| (r.alg_name, r.n, metric.value(r))),
        func,
    )
}

/// Grouping/reduction over pre-extracted (algorithm, n, value) triples.
///
/// Shared by the raw-metric and ratio pipelines.
pub fn aggregate_values(
    items: impl IntoIterator<Item = (Algorithm, u64, f64)>,
    func: AggFn,
) -> Vec<AggregatedRow> {
    let mut groups: BTreeMap<(Algorithm, u64), Vec<f64>> = BTreeMap::new();
    for (alg, n, value) in items {
        groups.entry((alg, n)).or_default().push(value);
    }

    groups
        .into_iter()
        .map(|((alg, n), values)| AggregatedRow {
            alg,
            n,
            value: func.reduce(&values),
        })
        .collect()
}

/// Sample variance of the metric across all algorithms sharing an
/// (n, k) instance group. Groups with fewer than two rows are omitted.
pub fn variance_by_instance(rows: &[Measurement], metric: Metric) -> Vec<VarianceRow> {
    let mut groups: BTreeMap<(u64, OrderedFloat<f64>), Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.n, OrderedFloat(row.k)))
            .or_default()
            .push(metric.value(row));
    }

    groups
        .into_iter()
        .filter(|(_, values)| values.len() >= 2)
        .map(|((n, k), values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (values.len() - 1) as f64;
            VarianceRow {
                n,
                k: k.into_inner(),
                variance,
            }
        })
        .collect()
}

/// Print an aggregated table to the console.
pub fn print_table(rows: &[AggregatedRow], metric: Metric, func: AggFn) {
    println!("\n{:-<50}", "");
    println!("{} {} per (algorithm, n)", func.label(), metric.column());
    println!("{:-<50}", "");
    println!("  {:>12} {:>8} {:>14}", "Algorithm", "n", "Value");

    for row in rows {
        println!("  {:>12} {:>8} {:>14.3}", row.alg.name(), row.n, row.value);
    }
}

/// Print the per-instance variance table to the console.
pub fn print_variance(rows: &[VarianceRow], metric: Metric) {
    println!("\nVariance of {} per (n, k) instance:", metric.column());
    for row in rows {
        println!("  n={:<6} k={:<10} var={:.3}", row.n, row.k, row.variance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(alg: Algorithm, n: u64, k: f64, time: f64, edges: u64) -> Measurement {
        Measurement {
            test_name: format!("test_{n}"),
            n,
            k,
            time,
            edges,
            alg_name: alg,
        }
    }

    #[test]
    fn average_reduces_to_arithmetic_mean() {
        let rows = vec![
            row(Algorithm::Poranen, 5, 0.0, 10.0, 8),
            row(Algorithm::Poranen, 5, 0.0, 20.0, 8),
            row(Algorithm::FacialWalks, 5, 0.0, 5.0, 9),
        ];

        let agg = aggregate(&rows, Metric::Time, AggFn::Average);

        let poranen = agg
            .iter()
            .find(|r| r.alg == Algorithm::Poranen)
            .unwrap();
        assert_eq!(poranen.n, 5);
        assert_eq!(poranen.value, 15.0);
    }

    #[test]
    fn minimum_reduces_to_smallest_value() {
        let rows = vec![
            row(Algorithm::Schmid, 12, 0.0, 42.0, 30),
            row(Algorithm::Schmid, 12, 0.0, 17.0, 28),
        ];

        let agg = aggregate(&rows, Metric::Time, AggFn::Minimum);

        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].value, 17.0);
    }

    #[test]
    fn absent_pairs_are_not_zero_filled() {
        let rows = vec![
            row(Algorithm::Poranen, 5, 0.0, 1.0, 8),
            row(Algorithm::Calinescu, 10, 0.0, 2.0, 20),
        ];

        let agg = aggregate(&rows, Metric::Edges, AggFn::Average);

        assert_eq!(agg.len(), 2);
        assert!(!agg
            .iter()
            .any(|r| r.alg == Algorithm::Poranen && r.n == 10));
        assert!(!agg
            .iter()
            .any(|r| r.alg == Algorithm::Calinescu && r.n == 5));
    }

    #[test]
    fn partitions_split_on_both_algorithm_and_n() {
        let rows = vec![
            row(Algorithm::My, 5, 0.0, 2.0, 6),
            row(Algorithm::My, 10, 0.0, 4.0, 18),
            row(Algorithm::Schmid, 5, 0.0, 8.0, 7),
        ];

        let agg = aggregate(&rows, Metric::Time, AggFn::Average);

        assert_eq!(agg.len(), 3);
        for r in &agg {
            // Each partition holds a single row here, so the reduction
            // must return that row's value untouched.
            assert!(r.value == 2.0 || r.value == 4.0 || r.value == 8.0);
        }
    }

    #[test]
    fn variance_uses_sample_denominator() {
        let rows = vec![
            row(Algorithm::Poranen, 5, 1.5, 0.0, 10),
            row(Algorithm::Schmid, 5, 1.5, 0.0, 14),
        ];

        let var = variance_by_instance(&rows, Metric::Edges);

        assert_eq!(var.len(), 1);
        assert_eq!(var[0].n, 5);
        assert_eq!(var[0].k, 1.5);
        // Sample variance of {10, 14}: ((10-12)^2 + (14-12)^2) / 1 = 8.
        assert_eq!(var[0].variance, 8.0);
    }

    #[test]
    fn variance_omits_single_row_groups() {
        let rows = vec![
            row(Algorithm::Poranen, 5, 1.5, 0.0, 10),
            row(Algorithm::Poranen, 5, 2.5, 0.0, 11),
        ];

        let var = variance_by_instance(&rows, Metric::Edges);

        assert!(var.is_empty());
    }

    #[test]
    fn variance_groups_on_k_not_just_n() {
        let rows = vec![
            row(Algorithm::Poranen, 5, 1.0, 0.0, 10),
            row(Algorithm::Schmid, 5, 1.0, 0.0, 12),
            row(Algorithm::Poranen, 5, 2.0, 0.0, 30),
            row(Algorithm::Schmid, 5, 2.0, 0.0, 34),
        ];

        let var = variance_by_instance(&rows, Metric::Edges);

        assert_eq!(var.len(), 2);
        assert_eq!(var[0].variance, 2.0);
        assert_eq!(var[1].variance, 8.0);
    }

    proptest! {
        #[test]
        fn aggregated_pairs_are_unique_and_bounded(
            entries in proptest::collection::vec(
                (0u8..4, 1u64..16, 0.0f64..1000.0),
                1..64,
            )
        ) {
            let algs = [
                Algorithm::Poranen,
                Algorithm::My,
                Algorithm::Schmid,
                Algorithm::Calinescu,
            ];
            let rows: Vec<Measurement> = entries
                .iter()
                .map(|&(a, n, t)| row(algs[a as usize], n, 0.0, t, 0))
                .collect();

            let agg = aggregate(&rows, Metric::Time, AggFn::Average);

            let mut seen = std::collections::HashSet::new();
            for r in &agg {
                prop_assert!(seen.insert((r.alg, r.n)));

                let group: Vec<f64> = rows
                    .iter()
                    .filter(|m| m.alg_name == r.alg && m.n == r.n)
                    .map(|m| m.time)
                    .collect();
                let min = group.iter().copied().fold(f64::INFINITY, f64::min);
                let max = group.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(r.value >= min - 1e-9 && r.value <= max + 1e-9);
            }
        }
    }
}
