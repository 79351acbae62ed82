/// Indel-normalized similarity between two strings, scaled to 0..=100.
///
/// `2 * LCS / (len_a + len_b)` over chars. 100 means identical, 0 means
/// nothing in common. Comparison is case- and whitespace-sensitive; callers normalize
/// their inputs if they need to.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(&a, &b) as f64 / total as f64
}

/// Single-row dynamic programming table, O(len_a * len_b) time.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Arithmetic mean of per-field ratios over the pairs present on both sides.
/// Returns 0 when no pair is comparable.
pub fn mean_ratio<'a, I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let (total, count) = pairs
        .into_iter()
        .fold((0.0, 0usize), |(total, count), (a, b)| {
            (total + ratio(a, b), count + 1)
        });
    if count == 0 { 0.0 } else { total / count as f64 }
}
