/// Largest-Triangle-Three-Buckets (LTTB) downsampling of `[x, y]` points.
/// Keeps the first and last point; returns the input when it is already
/// within `target`.
pub fn lttb_downsample(points: &[[f64; 2]], target: usize) -> Vec<[f64; 2]> {
    let n = points.len();
    if n <= target || target < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(target);
    out.push(points[0]);

    let bucket_size = (n - 2) as f64 / (target - 2) as f64;
    let mut prev = points[0];

    for i in 0..(target - 2) {
        let bucket_start = ((i as f64 * bucket_size) as usize + 1).min(n - 1);
        let bucket_end = (((i + 1) as f64 * bucket_size) as usize + 1).min(n - 1);

        // Average of the next bucket is the third triangle vertex.
        let next_start = bucket_end;
        let next_end = (((i + 2) as f64 * bucket_size) as usize + 1).min(n);
        let next = &points[next_start..next_end.max(next_start + 1).min(n)];
        let avg_x = next.iter().map(|p| p[0]).sum::<f64>() / next.len() as f64;
        let avg_y = next.iter().map(|p| p[1]).sum::<f64>() / next.len() as f64;

        let mut best = points[bucket_start];
        let mut max_area = -1.0f64;
        for p in &points[bucket_start..bucket_end.max(bucket_start + 1)] {
            // Doubled triangle area; only compared.
            let area = ((prev[0] - avg_x) * (p[1] - prev[1]) - (prev[0] - p[0]) * (avg_y - prev[1])).abs();
            if area > max_area {
                max_area = area;
                best = *p;
            }
        }

        out.push(best);
        prev = best;
    }

    out.push(points[n - 1]);
    out
}

/// Every `step`-th point starting with the first.
pub fn stride<T: Copy>(points: &[T], step: usize) -> Vec<T> {
    points.iter().step_by(step.max(1)).copied().collect()
}
