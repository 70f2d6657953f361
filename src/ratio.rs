use crate::aggregate::{aggregate_values, AggFn, AggregatedRow};
use crate::dataset::{Algorithm, Measurement, Metric};
use std::collections::BTreeMap;

/// Exact algorithm the approximation ratios are computed against.
pub const BASELINE: Algorithm = Algorithm::FacialWalks;

/// A non-baseline measurement normalized by a baseline value at the same n.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioRow {
    pub alg: Algorithm,
    pub n: u64,
    pub ratio: f64,
}

/// Inner-join every non-baseline measurement to the baseline rows on n
/// and divide the chosen metric by the baseline's value.
///
/// The join is on n alone: a measurement with no baseline row at its n is
/// dropped, and a measurement matching several baseline rows produces one
/// ratio row per match. Result files are expected to hold a single
/// baseline run per n, which makes the join one-to-one in practice.
pub fn ratio_to_baseline(rows: &[Measurement], metric: Metric) -> Vec<RatioRow> {
    let mut baseline: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.alg_name == BASELINE) {
        baseline.entry(row.n).or_default().push(metric.value(row));
    }

    let mut ratios = Vec::new();
    for row in rows.iter().filter(|r| r.alg_name != BASELINE) {
        let Some(matches) = baseline.get(&row.n) else {
            continue;
        };
        for &base in matches {
            ratios.push(RatioRow {
                alg: row.alg_name,
                n: row.n,
                ratio: metric.value(row) / base,
            });
        }
    }
    ratios
}

/// Group ratio rows by (algorithm, n) and reduce, exactly as the raw
/// metric tables are aggregated.
pub fn aggregate_ratios(ratios: &[RatioRow], func: AggFn) -> Vec<AggregatedRow> {
    aggregate_values(ratios.iter().map(|r| (r.alg, r.n, r.ratio)), func)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(alg: Algorithm, n: u64, time: f64) -> Measurement {
        Measurement {
            test_name: format!("test_{n}"),
            n,
            k: 0.0,
            time,
            edges: 0,
            alg_name: alg,
        }
    }

    #[test]
    fn ratio_divides_by_matching_baseline() {
        let rows = vec![
            row(Algorithm::Poranen, 5, 10.0),
            row(Algorithm::Poranen, 5, 20.0),
            row(Algorithm::FacialWalks, 5, 5.0),
        ];

        let ratios = ratio_to_baseline(&rows, Metric::Time);

        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0].ratio, 2.0);
        assert_eq!(ratios[1].ratio, 4.0);

        let agg = aggregate_ratios(&ratios, AggFn::Average);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].alg, Algorithm::Poranen);
        assert_eq!(agg[0].n, 5);
        assert_eq!(agg[0].value, 3.0);
    }

    #[test]
    fn baseline_never_appears_in_ratio_output() {
        let rows = vec![
            row(Algorithm::FacialWalks, 5, 5.0),
            row(Algorithm::FacialWalks, 10, 9.0),
            row(Algorithm::Calinescu, 10, 18.0),
        ];

        let ratios = ratio_to_baseline(&rows, Metric::Time);

        assert!(ratios.iter().all(|r| r.alg != BASELINE));
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[0].ratio, 2.0);
    }

    #[test]
    fn rows_without_baseline_match_are_dropped() {
        let rows = vec![
            row(Algorithm::My, 7, 14.0),
            row(Algorithm::FacialWalks, 5, 5.0),
        ];

        let ratios = ratio_to_baseline(&rows, Metric::Time);

        assert!(ratios.is_empty());
    }

    #[test]
    fn ratio_fans_out_over_duplicate_baseline_rows() {
        let rows = vec![
            row(Algorithm::Schmid, 5, 12.0),
            row(Algorithm::FacialWalks, 5, 4.0),
            row(Algorithm::FacialWalks, 5, 6.0),
        ];

        let ratios = ratio_to_baseline(&rows, Metric::Time);

        // One ratio row per (measurement, baseline) pair at the same n.
        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0].ratio, 3.0);
        assert_eq!(ratios[1].ratio, 2.0);
    }

    #[test]
    fn ratios_join_on_n_per_algorithm() {
        let rows = vec![
            row(Algorithm::Poranen, 5, 10.0),
            row(Algorithm::Schmid, 5, 15.0),
            row(Algorithm::Poranen, 10, 30.0),
            row(Algorithm::FacialWalks, 5, 5.0),
            row(Algorithm::FacialWalks, 10, 10.0),
        ];

        let agg = aggregate_ratios(&ratio_to_baseline(&rows, Metric::Time), AggFn::Average);

        assert_eq!(agg.len(), 3);
        let value = |alg, n| {
            agg.iter()
                .find(|r| r.alg == alg && r.n == n)
                .unwrap()
                .value
        };
        assert_eq!(value(Algorithm::Poranen, 5), 2.0);
        assert_eq!(value(Algorithm::Schmid, 5), 3.0);
        assert_eq!(value(Algorithm::Poranen, 10), 3.0);
    }
}
