use std::collections::HashMap;

/// Locate the header row among the first `max_rows` rows.
///
/// Scans bottom-up for the last row that has the most common width and
/// consists only of non-empty, non-numeric, non-date cells. Falls back to 0.
pub fn detect_header_row(rows: &[Vec<String>], max_rows: usize) -> usize {
    let rows: Vec<&Vec<String>> = rows
        .iter()
        .take(max_rows)
        .collect();

    if rows.is_empty() {
        return 0;
    }

    // Trailing empty cells (common in spreadsheets) don't count towards width.
    let width = |row: &Vec<String>| {
        row.iter()
            .rposition(|c| !c.trim().is_empty())
            .map_or(0, |i| i + 1)
    };

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for row in &rows {
        let w = width(row);
        if w > 0 {
            *counts.entry(w).or_insert(0) += 1;
        }
    }
    let most_common = counts
        .into_iter()
        .max_by_key(|&(len, c)| (c, len))
        .map(|(len, _)| len)
        .unwrap_or(0);

    for i in (0..rows.len()).rev() {
        let row = rows[i];
        if width(row) != most_common {
            continue;
        }
        let all_text = row[..most_common].iter().all(|cell| {
            let trimmed = cell.trim();
            !trimmed.is_empty() && trimmed.parse::<f64>().is_err() && !is_date_like(trimmed)
        });
        if all_text {
            return i;
        }
    }

    0
}

fn is_date_like(s: &str) -> bool {
    let lower = s.to_lowercase();
    let has_separators = s.contains('/') || s.contains(':') || s.contains('-');
    let has_date_words = lower.ends_with("am") || lower.ends_with("pm");

    if !has_separators && !has_date_words {
        return false;
    }

    crate::data::datetime::detect_date_format(&[s.to_string()]).is_some()
}
