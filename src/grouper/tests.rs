use super::fit::{best_fit, ChargeFit};
use super::*;
use crate::feature::{Feature, FeatureRow, GroupingTag};
use crate::tolerance::{MobilityTolerance, MzTolerance, RtTolerance};
use proptest::prelude::*;

fn row(id: i64, mz: f64, rt: f64, height: f64) -> FeatureRow {
    FeatureRow::new(id, Feature::new(mz, rt, height))
}

fn config() -> GrouperConfig {
    GrouperConfig::new(MzTolerance::absolute(0.01), RtTolerance::minutes(0.1))
}

fn ids(rows: &[OutputRow]) -> Vec<i64> {
    rows.iter().map(|r| r.row.id).collect()
}

fn pattern_ids(row: &OutputRow) -> Vec<i64> {
    row.row
        .isotope_pattern
        .as_ref()
        .map(|p| p.row_ids().collect())
        .unwrap_or_default()
}

#[test]
fn test_simple_charge_one_group() {
    let rows = vec![
        row(1, 500.0, 5.0, 1000.0),
        row(2, 501.0033, 5.0, 450.0),
        row(3, 502.0066, 5.0, 120.0),
        row(4, 650.2, 5.0, 800.0),
    ];

    let out = group(&rows, &config()).unwrap();

    assert_eq!(out.len(), 2);
    assert!(out[0].is_merged());
    assert_eq!(out[0].charge(), Some(1));
    assert_eq!(out[0].row.id, 1);
    assert_eq!(pattern_ids(&out[0]), vec![1, 2, 3]);
    assert_eq!(out[0].members(), &[0, 1, 2]);

    assert_eq!(
        out[0].row.grouping,
        Some(GroupingTag::merged(vec![1, 2, 3]))
    );

    assert!(!out[1].is_merged());
    assert_eq!(out[1].row.feature, rows[3].feature);
    assert_eq!(out[1].row.grouping, Some(GroupingTag::pass_through(4)));
    assert_eq!(out[1].charge(), None);
}

#[test]
fn test_second_isotope_step_of_charge_two() {
    // B sits at +spacing/2 and C at +spacing, which is step two of the
    // charge 2 walk; charge 2 therefore fits three features and wins outright
    let rows = vec![
        row(1, 500.000, 5.0, 1000.0),
        row(2, 500.5017, 5.0, 400.0),
        row(3, 501.0033, 5.0, 150.0),
    ];

    let out = group(&rows, &config()).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].charge(), Some(2));
    assert_eq!(pattern_ids(&out[0]), vec![1, 2, 3]);
}

#[test]
fn test_charge_tie_prefers_lowest_charge() {
    // X is 0.75 above the seed: within 0.26 of both +1.0033 (z=1) and
    // +0.50165 (z=2), so both hypotheses score 2
    let rows = vec![row(1, 500.0, 5.0, 1000.0), row(2, 500.75, 5.0, 300.0)];
    let config = config().with_mz_tolerance(MzTolerance::absolute(0.26));

    let grouper = IsotopeGrouper::new(&rows, &config).unwrap();
    let fits = grouper.fit_all_charges(0);
    assert_eq!(fits.len(), 2);
    assert_eq!(fits[0].score(), 2);
    assert_eq!(fits[1].score(), 2);

    let out = group(&rows, &config).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].charge(), Some(1));
}

#[test]
fn test_best_fit_selection() {
    let fit = |charge: i32, n: usize| ChargeFit {
        charge,
        slots: (0..n).collect(),
    };

    let best = best_fit(vec![fit(1, 2), fit(2, 2), fit(3, 2)]).unwrap();
    assert_eq!(best.charge, 1);

    let best = best_fit(vec![fit(3, 2), fit(2, 2), fit(1, 2)]).unwrap();
    assert_eq!(best.charge, 1);

    let best = best_fit(vec![fit(1, 2), fit(2, 4), fit(3, 3)]).unwrap();
    assert_eq!(best.charge, 2);

    assert!(best_fit(Vec::new()).is_none());
}

#[test]
fn test_monotonic_shape_ignores_lighter_isotopes() {
    let rows = vec![row(1, 500.0, 5.0, 1000.0), row(2, 498.9967, 5.0, 300.0)];

    let out = group(&rows, &config().with_monotonic_shape(true)).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| !r.is_merged()));

    let out = group(&rows, &config().with_monotonic_shape(false)).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].charge(), Some(1));
    assert_eq!(out[0].row.feature.mz, 500.0);
    assert_eq!(pattern_ids(&out[0]), vec![1, 2]);
}

#[test]
fn test_boundary_follows_tolerance_predicate() {
    // candidate exactly 0.5 away from the expected position
    let rows = vec![row(1, 100.0, 1.0, 10.0), row(2, 101.5, 1.0, 5.0)];
    let base = config().with_isotope_spacing(1.0).with_max_charge(1);

    let closed = base.clone().with_mz_tolerance(MzTolerance::absolute(0.5));
    assert_eq!(group(&rows, &closed).unwrap().len(), 1);

    let open = base
        .clone()
        .with_mz_tolerance(|a: f64, b: f64| (a - b).abs() < 0.5);
    assert_eq!(group(&rows, &open).unwrap().len(), 2);

    let inclusive = base.with_mz_tolerance(|a: f64, b: f64| (a - b).abs() <= 0.5);
    assert_eq!(group(&rows, &inclusive).unwrap().len(), 1);
}

#[test]
fn test_all_matches_of_a_step_are_absorbed() {
    let rows = vec![
        row(1, 500.0, 5.0, 1000.0),
        row(2, 501.000, 5.0, 200.0),
        row(3, 501.006, 5.0, 180.0),
    ];

    let out = group(&rows, &config().with_max_charge(1)).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(pattern_ids(&out[0]), vec![1, 2, 3]);
}

#[test]
fn test_gaps_are_not_bridged() {
    let rows = vec![row(1, 500.0, 5.0, 1000.0), row(2, 502.0066, 5.0, 200.0)];

    let out = group(&rows, &config()).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| !r.is_merged()));
}

#[test]
fn test_rt_tolerance_excludes_distant_candidates() {
    let rows = vec![row(1, 500.0, 5.0, 1000.0), row(2, 501.0033, 5.5, 400.0)];

    let out = group(&rows, &config()).unwrap();
    assert_eq!(out.len(), 2);

    let wide = config().with_rt_tolerance(RtTolerance::minutes(1.0));
    assert_eq!(group(&rows, &wide).unwrap().len(), 1);
}

#[test]
fn test_mobility_tolerance() {
    let rows = vec![
        FeatureRow::new(1, Feature::new(500.0, 5.0, 1000.0).with_mobility(0.90)),
        FeatureRow::new(2, Feature::new(501.0033, 5.0, 400.0).with_mobility(0.95)),
        FeatureRow::new(3, Feature::new(502.0066, 5.0, 100.0)),
    ];

    // without a mobility tolerance all three group
    let out = group(&rows, &config()).unwrap();
    assert_eq!(out.len(), 1);

    // the mobility mismatch stops the seed's walk at step one; the second
    // feature then seeds its own group with the mobility-less third one
    let strict = config().with_mobility_tolerance(MobilityTolerance::new(0.01));
    let out = group(&rows, &strict).unwrap();
    assert_eq!(out.len(), 2);
    assert!(!out[0].is_merged());
    assert_eq!(pattern_ids(&out[1]), vec![2, 3]);

    let loose = config().with_mobility_tolerance(MobilityTolerance::new(0.1));
    let out = group(&rows, &loose).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(pattern_ids(&out[0]), vec![1, 2, 3]);
}

#[test]
fn test_representative_policy() {
    let rows = vec![
        row(10, 800.0, 3.0, 500.0)
            .with_comment("mono")
            .with_fragment_scans(vec![3, 5]),
        row(11, 801.0033, 3.0, 900.0)
            .with_comment("seed")
            .with_identity("compound X")
            .with_fragment_scans(vec![5]),
        row(12, 802.0066, 3.0, 400.0).with_fragment_scans(vec![7]),
    ];
    let base = config().with_monotonic_shape(false);

    let out = group(&rows, &base).unwrap();
    assert_eq!(out.len(), 1);
    let merged = &out[0];
    assert_eq!(merged.row.id, 11);
    assert_eq!(merged.row.feature.mz, 801.0033);
    assert_eq!(merged.row.comment.as_deref(), Some("seed"));
    assert_eq!(merged.row.identity.as_deref(), Some("compound X"));
    assert_eq!(merged.row.fragment_scans, vec![5]);
    assert_eq!(pattern_ids(merged), vec![11, 10, 12]);
    assert_eq!(
        merged.origin,
        RowOrigin::Merged {
            seed: 1,
            representative: 1,
            members: vec![1, 0, 2],
        }
    );

    let lowest = base
        .clone()
        .with_representative(RepresentativeIsotope::LowestMz);
    let out = group(&rows, &lowest).unwrap();
    let merged = &out[0];
    assert_eq!(merged.row.id, 11);
    assert_eq!(merged.row.feature.mz, 800.0);
    assert_eq!(merged.row.comment.as_deref(), Some("seed"));
    assert_eq!(merged.row.fragment_scans, vec![3, 5]);
    assert_eq!(pattern_ids(merged), vec![10, 11, 12]);
    assert_eq!(merged.source(), 1);

    let keep_all = base.with_keep_all_ms2(true);
    let out = group(&rows, &keep_all).unwrap();
    assert_eq!(out[0].row.fragment_scans, vec![5, 3, 7]);
}

#[test]
fn test_representative_comparator() {
    let heavy = Feature::new(500.0, 1.0, 10.0);
    let light = Feature::new(400.0, 1.0, 5.0);

    let most_intense = RepresentativeIsotope::MostIntense;
    assert_eq!(most_intense.compare(&heavy, &light), std::cmp::Ordering::Less);

    let lowest_mz = RepresentativeIsotope::LowestMz;
    assert_eq!(lowest_mz.compare(&heavy, &light), std::cmp::Ordering::Greater);
}

#[test]
fn test_consumed_features_are_skipped() {
    let rows = vec![row(1, 500.0, 5.0, 1000.0), row(2, 501.0033, 5.0, 300.0)];
    let config = config();

    let mut grouper = IsotopeGrouper::new(&rows, &config).unwrap();
    assert_eq!(grouper.step(), Some(SeedOutcome::Merged { charge: 1, size: 2 }));
    assert_eq!(grouper.step(), Some(SeedOutcome::AlreadyConsumed));
    assert_eq!(grouper.step(), None);
    assert!(grouper.is_exhausted());
    assert_eq!(grouper.rows().len(), 1);
}

#[test]
fn test_equal_heights_keep_input_order() {
    let rows = vec![row(1, 300.0, 1.0, 100.0), row(2, 200.0, 1.0, 100.0)];

    let out = group(&rows, &config()).unwrap();
    assert_eq!(ids(&out), vec![1, 2]);
}

#[test]
fn test_pass_through_is_not_absorbed_later() {
    // a relative RT window is asymmetric: the first seed does not reach the
    // second feature, but the second would reach the first
    let rows = vec![row(1, 499.0, 5.55, 1000.0), row(2, 500.0033, 5.0, 200.0)];
    let config = config()
        .with_monotonic_shape(false)
        .with_rt_tolerance(RtTolerance::percent(10.0));

    let out = group(&rows, &config).unwrap();

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| !r.is_merged()));
    let mut covered: Vec<usize> = out.iter().flat_map(|r| r.members().to_vec()).collect();
    covered.sort_unstable();
    assert_eq!(covered, vec![0, 1]);
}

#[test]
fn test_relative_rt_window_is_centred_on_candidate() {
    // 10% of the candidate's 11.05 min reaches the seed at 10.0 min;
    // 10% of the seed's RT would not
    let rows = vec![row(1, 500.0, 10.0, 1000.0), row(2, 501.0033, 11.05, 300.0)];
    let config = config().with_rt_tolerance(RtTolerance::percent(10.0));

    let out = group(&rows, &config).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(pattern_ids(&out[0]), vec![1, 2]);

    let rows = vec![row(1, 500.0, 10.0, 1000.0), row(2, 501.0033, 9.05, 300.0)];
    let out = group(&rows, &config).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| !r.is_merged()));
}

#[test]
fn test_config_errors() {
    let rows = vec![row(1, 500.0, 5.0, 1000.0)];

    assert_eq!(
        group(&rows, &config().with_max_charge(0)).unwrap_err(),
        GrouperError::InvalidMaxCharge(0)
    );
    assert!(matches!(
        group(&rows, &config().with_isotope_spacing(0.0)),
        Err(GrouperError::InvalidIsotopeSpacing(_))
    ));
    assert!(matches!(
        group(&rows, &config().with_mz_tolerance(MzTolerance::absolute(-1.0))),
        Err(GrouperError::Tolerance(_))
    ));
    assert_eq!(group(&[], &config()).unwrap_err(), GrouperError::EmptyInput);
}

#[test]
fn test_progress_and_status() {
    let rows = vec![
        row(1, 500.0, 5.0, 1000.0),
        row(2, 501.0033, 5.0, 450.0),
        row(3, 700.0, 5.0, 300.0),
    ];
    let config = config();
    let control = TaskControl::new();
    assert_eq!(control.status(), TaskStatus::Waiting);
    assert_eq!(control.finished_percentage(), 0.0);

    let result = IsotopeGrouper::new(&rows, &config).unwrap().run(&control);

    assert!(result.is_finished());
    assert!(result.unvisited.is_empty());
    assert_eq!(control.status(), TaskStatus::Finished);
    assert_eq!(control.finished_percentage(), 1.0);
    assert_eq!(result.stats.seeds_visited, 3);
    assert_eq!(result.stats.groups_formed, 1);
    assert_eq!(result.stats.pass_through, 1);
    assert_eq!(result.stats.features_merged, 2);
    assert_eq!(result.stats.charge_counts.get(&1), Some(&1));
    assert_eq!(result.stats.rows_out(), 2);
}

fn isolated_rows(n: usize) -> Vec<FeatureRow> {
    (0..n)
        .map(|i| row(i as i64 + 1, 100.0 + i as f64 * 10.0, 5.0, 1000.0 - i as f64))
        .collect()
}

#[test]
fn test_cancellation_keeps_committed_prefix() {
    let rows = isolated_rows(100);
    let config = config();

    let full = group(&rows, &config).unwrap();
    assert_eq!(full.len(), 100);

    let control = TaskControl::new();
    let mut grouper = IsotopeGrouper::new(&rows, &config).unwrap();
    for _ in 0..40 {
        grouper.step();
    }
    control.cancel();
    let result = grouper.run(&control);

    assert_eq!(result.status, GroupingStatus::Canceled);
    assert_eq!(control.status(), TaskStatus::Canceled);
    assert!((control.finished_percentage() - 0.4).abs() < 1e-12);
    assert_eq!(result.rows.len(), 40);
    assert_eq!(result.rows[..], full[..40]);
    assert_eq!(result.unvisited.len(), 60);
    assert_eq!(result.unvisited[0], 40);
}

#[test]
fn test_cancel_before_start() {
    let rows = isolated_rows(5);
    let config = config();
    let control = TaskControl::new();
    control.cancel();

    let result = IsotopeGrouper::new(&rows, &config).unwrap().run(&control);
    assert_eq!(result.status, GroupingStatus::Canceled);
    assert!(result.rows.is_empty());
    assert_eq!(result.unvisited.len(), 5);
}

/// Five compounds with isotope envelopes plus background noise
fn realistic_sample() -> Vec<FeatureRow> {
    let spacing = DEFAULT_ISOTOPE_SPACING;
    let mut rows = Vec::new();
    let mut id = 1;
    let mut push = |rows: &mut Vec<FeatureRow>, mz: f64, rt: f64, height: f64| {
        rows.push(row(id, mz, rt, height));
        id += 1;
    };

    for (mono, rt) in [(200.1, 1.2), (315.7, 3.4), (452.3, 3.41), (610.9, 7.8)] {
        push(&mut rows, mono, rt, 1.0e5);
        push(&mut rows, mono + spacing, rt + 0.01, 6.0e4);
        push(&mut rows, mono + 2.0 * spacing, rt - 0.01, 2.0e4);
    }
    for n in 0..4 {
        let height = [8.0e4, 5.0e4, 1.5e4, 4.0e3][n];
        push(&mut rows, 733.4 + n as f64 * spacing / 2.0, 9.1, height);
    }
    for (mz, rt) in [(150.05, 0.8), (388.21, 3.4), (905.5, 12.0)] {
        push(&mut rows, mz, rt, 3.0e3);
    }
    rows
}

#[test]
fn test_realistic_sample() {
    let rows = realistic_sample();
    let out = group(&rows, &config()).unwrap();

    assert_eq!(out.iter().filter(|r| r.is_merged()).count(), 5);
    assert_eq!(out.iter().filter(|r| !r.is_merged()).count(), 3);
    let charges: Vec<i32> = out.iter().filter_map(|r| r.charge()).collect();
    assert_eq!(charges.iter().filter(|&&z| z == 2).count(), 1);
    assert_eq!(charges.iter().filter(|&&z| z == 1).count(), 4);
}

#[test]
fn test_regrouping_representatives_merges_nothing() {
    let rows = realistic_sample();
    let config = config();
    let first = group(&rows, &config).unwrap();

    let representatives: Vec<FeatureRow> = first
        .iter()
        .map(|r| FeatureRow::new(r.row.id, r.row.feature))
        .collect();
    let second = group(&representatives, &config).unwrap();

    assert_eq!(second.len(), representatives.len());
    assert!(second.iter().all(|r| !r.is_merged()));
}

proptest! {
    #[test]
    fn prop_every_feature_covered_once(
        features in prop::collection::vec((100.0f64..104.0, 0.0f64..1.0, 1.0f64..1.0e4), 1..60),
        monotonic in any::<bool>(),
        lowest_mz in any::<bool>(),
    ) {
        let rows: Vec<FeatureRow> = features
            .iter()
            .enumerate()
            .map(|(i, &(mz, rt, height))| row(i as i64, mz, rt, height))
            .collect();
        let policy = if lowest_mz {
            RepresentativeIsotope::LowestMz
        } else {
            RepresentativeIsotope::MostIntense
        };
        let config = GrouperConfig::new(MzTolerance::absolute(0.05), RtTolerance::minutes(0.3))
            .with_max_charge(3)
            .with_monotonic_shape(monotonic)
            .with_representative(policy);

        let out = group(&rows, &config).unwrap();

        let mut covered: Vec<usize> = out.iter().flat_map(|r| r.members().to_vec()).collect();
        covered.sort_unstable();
        prop_assert_eq!(covered, (0..rows.len()).collect::<Vec<_>>());

        for merged in out.iter().filter(|r| r.is_merged()) {
            let charge = merged.charge().unwrap_or_default();
            prop_assert!((1..=3).contains(&charge));

            let pattern = merged.row.isotope_pattern.as_ref().unwrap();
            prop_assert!(pattern.len() >= 2);
            let expected: Vec<i64> = merged.members().iter().map(|&i| rows[i].id).collect();
            prop_assert_eq!(pattern.row_ids().collect::<Vec<_>>(), expected);

            for pair in pattern.entries.windows(2) {
                match policy {
                    RepresentativeIsotope::MostIntense => prop_assert!(pair[0].height >= pair[1].height),
                    RepresentativeIsotope::LowestMz => prop_assert!(pair[0].mz <= pair[1].mz),
                }
            }
        }
    }
}
