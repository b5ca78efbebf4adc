use std::cmp::Ordering;

/// Index of the largest score. Ties resolve to the earliest index and NaN
/// never wins against a real number.
pub(crate) fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &score)| match best {
            None => Some((i, score)),
            Some((_, best_score)) => match score.partial_cmp(&best_score) {
                Some(Ordering::Greater) => Some((i, score)),
                None if best_score.is_nan() && !score.is_nan() => Some((i, score)),
                _ => best,
            },
        })
        .map(|(i, _)| i)
}
