use super::*;
use crate::model::table::{RatingRow, RatingTable};

fn table(rows: &[(&str, &str, &str, &[Option<f64>])]) -> RatingTable {
    RatingTable {
        raters: (0..rows.first().map(|r| r.3.len()).unwrap_or(0))
            .map(|i| format!("Manager_{}", i + 1))
            .collect(),
        rows: rows
            .iter()
            .map(|(f, c, s, ratings)| RatingRow {
                function: f.to_string(),
                category: c.to_string(),
                subcategory: s.to_string(),
                ratings: ratings.to_vec(),
            })
            .collect(),
    }
}

#[test]
fn test_sample_std_dev_known_values() {
    let t = table(&[("F", "C", "S-01", &[Some(1.0), Some(2.0), Some(3.0)])]);
    let d = compute_dispersion(&t);
    assert!((d[0].std_dev.unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(d[0].range, Some(2.0));
}

#[test]
fn test_zero_dispersion_iff_all_equal() {
    let t = table(&[
        ("F", "C", "S-01", &[Some(4.0), Some(4.0), Some(4.0)]),
        ("F", "C", "S-02", &[Some(4.0), Some(4.0), Some(5.0)]),
    ]);
    let d = compute_dispersion(&t);
    assert_eq!(d[0].std_dev, Some(0.0));
    assert_eq!(d[0].range, Some(0.0));
    assert!(d[1].std_dev.unwrap() > 0.0);
    assert!(d[1].range.unwrap() > 0.0);
}

#[test]
fn test_single_rating_std_undefined_range_zero() {
    let t = table(&[("F", "C", "S-01", &[Some(3.0), None, None])]);
    let d = compute_dispersion(&t);
    assert_eq!(d[0].std_dev, None);
    assert_eq!(d[0].range, Some(0.0));
}

#[test]
fn test_no_ratings_both_undefined() {
    let t = table(&[("F", "C", "S-01", &[None, None])]);
    let d = compute_dispersion(&t);
    assert_eq!(d[0].std_dev, None);
    assert_eq!(d[0].range, None);
}

#[test]
fn test_missing_rating_excluded_not_zeroed() {
    // A missing score must not drag the std dev the way a 0 would.
    let with_missing = table(&[("F", "C", "S-01", &[Some(4.0), Some(4.0), None])]);
    let with_zero = table(&[("F", "C", "S-01", &[Some(4.0), Some(4.0), Some(0.0)])]);
    let dm = compute_dispersion(&with_missing);
    let dz = compute_dispersion(&with_zero);
    assert_eq!(dm[0].std_dev, Some(0.0));
    assert!(dz[0].std_dev.unwrap() > 0.0);
}

#[test]
fn test_high_disagreement_filters_and_sorts_descending() {
    let t = table(&[
        ("F", "C", "S-01", &[Some(1.0), Some(1.0)]),
        ("F", "C", "S-02", &[Some(0.0), Some(6.0)]),
        ("F", "C", "S-03", &[Some(1.0), Some(4.0)]),
    ]);
    let d = compute_dispersion(&t);
    let high = high_disagreement(&t, &d, 1.0);
    assert_eq!(high.threshold, 1.0);
    let subs: Vec<&str> = high.items.iter().map(|i| i.subcategory.as_str()).collect();
    assert_eq!(subs, vec!["S-02", "S-03"]);
    assert!(high.items[0].std_dev > high.items[1].std_dev);
}

#[test]
fn test_high_disagreement_threshold_is_strict() {
    // std dev of [1, 3] is sqrt(2) > 1; std dev of [2, 3] is ~0.707 < 1.
    let t = table(&[
        ("F", "C", "S-01", &[Some(2.0), Some(3.0)]),
        ("F", "C", "S-02", &[Some(1.0), Some(3.0)]),
    ]);
    let d = compute_dispersion(&t);
    let high = high_disagreement(&t, &d, 1.0);
    assert_eq!(high.items.len(), 1);
    assert_eq!(high.items[0].subcategory, "S-02");
}

#[test]
fn test_high_disagreement_ties_keep_input_order() {
    let t = table(&[
        ("F", "C", "S-01", &[Some(0.0), Some(4.0)]),
        ("F", "C", "S-02", &[Some(1.0), Some(5.0)]),
    ]);
    let d = compute_dispersion(&t);
    let high = high_disagreement(&t, &d, 1.0);
    let subs: Vec<&str> = high.items.iter().map(|i| i.subcategory.as_str()).collect();
    assert_eq!(subs, vec!["S-01", "S-02"]);
}
