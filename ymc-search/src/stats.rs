//! Per-move rollout statistics and ranking.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// The `cap` highest scores seen so far.
#[derive(Debug, Clone)]
pub struct TopN {
    cap: usize,
    // Min-heap: the root is the smallest kept score, evicted first.
    heap: BinaryHeap<Reverse<u16>>,
    sum: u64,
}

impl TopN {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            heap: BinaryHeap::with_capacity(cap.saturating_add(1)),
            sum: 0,
        }
    }

    pub fn push(&mut self, score: u16) {
        if self.cap == 0 {
            return;
        }
        if self.heap.len() < self.cap {
            self.heap.push(Reverse(score));
            self.sum += score as u64;
            return;
        }
        if let Some(&Reverse(min)) = self.heap.peek() {
            if score > min {
                self.heap.pop();
                self.heap.push(Reverse(score));
                self.sum = self.sum - min as u64 + score as u64;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Mean of the kept scores; `None` when nothing was pushed.
    pub fn average(&self) -> Option<f64> {
        if self.heap.is_empty() {
            None
        } else {
            Some(self.sum as f64 / self.heap.len() as f64)
        }
    }

    /// Kept scores, highest first.
    pub fn sorted_desc(&self) -> Vec<u16> {
        let mut v: Vec<u16> = self.heap.iter().map(|r| r.0).collect();
        v.sort_unstable_by(|a, b| b.cmp(a));
        v
    }
}

/// Running totals for one candidate move.
#[derive(Debug, Clone)]
pub struct MoveStats {
    pub games: u64,
    pub score_sum: u64,
    pub wins: u64,
    pub max_score: u16,
    top: TopN,
}

impl MoveStats {
    pub fn new(top_n: usize) -> Self {
        Self {
            games: 0,
            score_sum: 0,
            wins: 0,
            max_score: 0,
            top: TopN::new(top_n),
        }
    }

    pub fn record(&mut self, score: u16, won: bool) {
        self.games += 1;
        self.score_sum += score as u64;
        if won {
            self.wins += 1;
        }
        self.max_score = self.max_score.max(score);
        self.top.push(score);
    }

    pub fn mean_score(&self) -> Option<f64> {
        (self.games > 0).then(|| self.score_sum as f64 / self.games as f64)
    }

    pub fn win_rate(&self) -> Option<f64> {
        (self.games > 0).then(|| self.wins as f64 / self.games as f64)
    }

    /// Ranking statistic: mean of the highest `top_n` scores.
    pub fn top_n_average(&self) -> Option<f64> {
        self.top.average()
    }

    pub fn top(&self) -> &TopN {
        &self.top
    }
}

/// Move indices ordered best first.
///
/// Higher top-N average wins; moves without rollouts come after every sampled move; ties
/// keep the lower index first.
pub fn rank(stats: &[MoveStats]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..stats.len()).collect();
    order.sort_by(|&a, &b| {
        match (stats[a].top_n_average(), stats[b].top_n_average()) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    order
}
