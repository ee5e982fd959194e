/// Ratcliff/Obershelp similarity of the lower-cased inputs, in `[0, 1]`.
///
/// The ratio is `2 * M / (len(a) + len(b))`, where `M` counts characters in
/// the recursively matched longest common blocks. Both argument orders are
/// matched and the larger count kept, so the score is symmetric.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = a.to_lowercase().chars().collect::<Vec<_>>();
    let right = b.to_lowercase().chars().collect::<Vec<_>>();

    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_characters(&left, &right).max(matching_characters(&right, &left));
    (2 * matched) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }

        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block inside `a[alo..ahi]` and `b[blo..bhi]`; the earliest
/// block in `a` wins ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo + 1;
    let mut best = (alo, blo, 0);
    let mut previous = vec![0_usize; width];
    let mut current = vec![0_usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            if a[i] == b[j] {
                let size = previous[slot - 1] + 1;
                current[slot] = size;
                if size > best.2 {
                    best = (i + 1 - size, j + 1 - size, size);
                }
            } else {
                current[slot] = 0;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    best
}
