//! Population statistics shared by the analysis modules

/// Arithmetic mean; zero for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`); zero for an empty slice
#[must_use]
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// True when at least two different values are present
#[must_use]
pub fn has_spread(values: &[f64]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().any(|v| v != first),
        None => false,
    }
}

/// `std_dev / |mean|` where a zero mean with spread is `+∞` and a zero mean
/// without spread is `0`
#[must_use]
pub fn bin_variation(mean: f64, std_dev: f64) -> f64 {
    if mean == 0.0 {
        if std_dev > 0.0 { f64::INFINITY } else { 0.0 }
    } else {
        std_dev / mean.abs()
    }
}

/// `std_dev / |mean|` where a zero mean counts as full variation (`1`)
#[must_use]
pub fn neighborhood_variation(mean: f64, std_dev: f64) -> f64 {
    if mean == 0.0 {
        1.0
    } else {
        std_dev / mean.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(population_std_dev(&values), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
    }

    #[test]
    fn test_has_spread() {
        assert!(!has_spread(&[]));
        assert!(!has_spread(&[3.0]));
        assert!(!has_spread(&[3.0, 3.0, 3.0]));
        assert!(has_spread(&[3.0, 3.0, 3.5]));
    }

    #[test]
    fn test_variation_sentinels() {
        assert_eq!(bin_variation(0.0, 0.0), 0.0);
        assert_eq!(bin_variation(0.0, 1.0), f64::INFINITY);
        assert_eq!(bin_variation(-4.0, 1.0), 0.25);

        assert_eq!(neighborhood_variation(0.0, 0.0), 1.0);
        assert_eq!(neighborhood_variation(-10.0, 0.5), 0.05);
    }
}
