/// Keeps the highest-scoring candidate offered so far.
///
/// A candidate replaces the current best only when its score is strictly
/// greater, starting from a floor of `0.0`: the first of several equal
/// maxima wins, and a candidate scoring exactly zero is never selected.
#[derive(Debug, Clone)]
pub struct BestCandidate<T> {
    best: Option<T>,
    best_score: f64,
}

impl<T> Default for BestCandidate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BestCandidate<T> {
    pub const fn new() -> Self {
        Self {
            best: None,
            best_score: 0.0,
        }
    }

    /// Returns `true` when `candidate` became the new best.
    pub fn offer(&mut self, candidate: T, score: f64) -> bool {
        if score > self.best_score {
            self.best = Some(candidate);
            self.best_score = score;
            return true;
        }
        false
    }

    pub const fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn into_best(self) -> Option<T> {
        self.best
    }
}
