use super::GroupPair;

/// All unordered pairs of `labels`, in lexicographic index order:
/// (0,1), (0,2), ..., (1,2), ...
pub fn group_pairs<S: AsRef<str>>(labels: &[S]) -> Vec<GroupPair> {
    let mut pairs = Vec::with_capacity(labels.len() * labels.len().saturating_sub(1) / 2);
    for i in 0..labels.len() {
        for j in (i + 1)..labels.len() {
            pairs.push(GroupPair::new(labels[i].as_ref(), labels[j].as_ref()));
        }
    }
    pairs
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared deviations from the mean.
///
/// Exactly zero when every value is identical, so constant groups never pick
/// up rounding noise.
pub fn sum_of_squares(values: &[f64]) -> f64 {
    match values.first() {
        None => 0.0,
        Some(&v0) if values.iter().all(|&v| v == v0) => 0.0,
        Some(_) => {
            let m = mean(values);
            values.iter().map(|&v| (v - m) * (v - m)).sum()
        }
    }
}

/// Sample variance (divisor n - 1); NaN below two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    sum_of_squares(values) / (values.len() - 1) as f64
}

/// `-log10(p)`. NaN stays NaN; p = 0 gives +inf.
pub fn neg_log10(p_value: f64) -> f64 {
    -p_value.log10()
}
