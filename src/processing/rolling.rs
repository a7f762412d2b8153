/// Trailing simple moving average.
///
/// Position `i` holds the mean of `values[i + 1 - window..=i]`; the first
/// `window - 1` positions have no value. A window of 0 yields no values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for (slot, win) in out[window - 1..].iter_mut().zip(values.windows(window)) {
        *slot = Some(win.iter().sum::<f64>() / window as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_positions_are_undefined() {
        let ma = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(ma, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn window_longer_than_series() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 3), vec![None, None]);
        assert_eq!(rolling_mean(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn window_of_one_is_identity() {
        let ma = rolling_mean(&[4.0, 8.0], 1);
        assert_eq!(ma, vec![Some(4.0), Some(8.0)]);
    }
}
