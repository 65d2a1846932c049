// Simple moving average over optional values
//
// A window is defined only when every value inside it is defined, so missing
// history propagates as `None` instead of turning into NaN.

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let mut results = vec![None; window - 1];
    for slice in values.windows(window) {
        let sum: Option<f64> = slice.iter().copied().sum();
        results.push(sum.map(|s| s / window as f64));
    }
    results
}
