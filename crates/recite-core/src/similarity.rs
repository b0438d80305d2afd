//! Fuzzy string similarity.
//!
//! Scores are the longest-matching-blocks ratio `2·M / T`, where `M` is the
//! number of characters in the matching blocks and `T` is the combined length
//! of both strings. The blocks are found by repeatedly taking the longest
//! common substring and recursing into the unmatched pieces on either side.

/// Characters removed before comparing answers, in addition to case folding.
const IGNORED: [char; 5] = [' ', '.', ',', '?', '!'];

/// Lowercase and drop spaces and `. , ? !`.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !IGNORED.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Similarity of two answers after [`normalize`], in `[0, 1]`.
///
/// Symmetric in its arguments: when the block search depends on argument
/// order the larger match count is used.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    let matches = matching_chars(&a, &b).max(matching_chars(&b, &a));
    score(matches, a.len() + b.len())
}

/// Order-dependent ratio of the raw strings, without normalization.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    score(matching_chars(&a, &b), a.len() + b.len())
}

fn score(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (2 * matches) as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_in_a, start_in_b, len)`. Ties go to the earliest start in `a`,
/// then the earliest start in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo;
            if a[i] == b[j] {
                let k = prev[col] + 1;
                cur[col + 1] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            } else {
                cur[col + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_k)
}
