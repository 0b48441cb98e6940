// the collection of numerical helpers shared by the symbolic engine and the graph sampler

/// `num_values` evenly spaced points, both ends included
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            let mut values: Vec<f64> = (0..num_values).map(|i| start + i as f64 * step).collect();
            // exact right end, no accumulated rounding
            values[num_values - 1] = end;
            values
        }
    }
}

/*
    let x_values = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let derivatives = numerical_derivative(&f, &x_values, 0.001);
*/
pub fn numerical_derivative<F>(f: &F, x_values: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    x_values
        .iter()
        .map(|&x| (f(x + h) - f(x - h)) / (2.0 * h))
        .collect()
}

// compute norm of two vectors
pub fn norm(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len());
    if x.is_empty() {
        return 0.0;
    }
    (1.0 / x.len() as f64) * x.iter().zip(y.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>().sqrt()
}

/// index of the grid point closest to `value`
pub fn nearest_index(xs: &[f64], value: f64) -> usize {
    xs.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Running trapezoid integral of `ys` over `xs`, equal to `anchor` at `xs[k]` and
/// accumulated outward in both directions. Past a non-finite sample the integral does
/// not exist, so every value beyond it (seen from `k`) is `NaN`.
pub fn cumulative_trapezoid(xs: &[f64], ys: &[f64], k: usize, anchor: f64) -> Vec<f64> {
    assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    let mut out = vec![f64::NAN; n];
    if n == 0 || k >= n {
        return out;
    }
    out[k] = if ys[k].is_finite() { anchor } else { f64::NAN };
    for i in k + 1..n {
        out[i] = out[i - 1] + 0.5 * (ys[i - 1] + ys[i]) * (xs[i] - xs[i - 1]);
    }
    for i in (0..k).rev() {
        out[i] = out[i + 1] - 0.5 * (ys[i] + ys[i + 1]) * (xs[i + 1] - xs[i]);
    }
    // NaN propagates through the sums; infinities are turned into NaN as well
    for value in out.iter_mut() {
        if !value.is_finite() {
            *value = f64::NAN;
        }
    }
    out
}
