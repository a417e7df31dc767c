use crate::core_types::{Fixed, StopId};
use crate::error::{PenaltyError, PtResult};
use crate::tour::Stop;

/// Pairwise transformed distances and dual potentials, both scaled.
pub trait CostModel {
    /// Transformed distance from `from` to `to`; potentials are still included.
    fn distance(&self, from: StopId, to: StopId) -> Fixed;

    /// Dual potential of a stop. Defaults to the value carried on the stop.
    #[inline(always)]
    fn potential(&self, stop: &Stop) -> Fixed {
        stop.pi
    }
}

/// Dense `n x n` matrix over the real id range. Virtual duplicates
/// (`id >= n`) are folded onto the real stop they mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    n: usize,
    weights: Vec<Fixed>,
}

impl CostMatrix {
    pub fn new(n: usize, weights: Vec<Fixed>) -> PtResult<Self> {
        if n == 0 {
            return Err(PenaltyError::Validation("Cost matrix has 0 rows".to_string()));
        }
        if weights.len() != n * n {
            return Err(PenaltyError::Validation(format!(
                "Cost matrix needs {} entries for {} stops, got {}",
                n * n,
                n,
                weights.len()
            )));
        }
        Ok(Self { n, weights })
    }

    pub fn from_rows(rows: &[Vec<Fixed>]) -> PtResult<Self> {
        let n = rows.len();
        let mut weights = Vec::with_capacity(n * n);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(PenaltyError::Validation(format!(
                    "Row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    n
                )));
            }
            weights.extend_from_slice(row);
        }
        Self::new(n, weights)
    }

    /// Every off-diagonal entry set to `w`.
    pub fn uniform(n: usize, w: Fixed) -> Self {
        let mut weights = vec![w; n * n];
        for i in 0..n {
            weights[i * n + i] = 0;
        }
        Self { n, weights }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn set(&mut self, from: StopId, to: StopId, w: Fixed) {
        let idx = self.idx(from, to);
        self.weights[idx] = w;
    }

    #[inline(always)]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.n + col
    }

    #[inline(always)]
    fn fold(&self, id: StopId) -> usize {
        if id >= self.n {
            id - self.n
        } else {
            id
        }
    }
}

impl CostModel for CostMatrix {
    #[inline(always)]
    fn distance(&self, from: StopId, to: StopId) -> Fixed {
        self.weights[self.idx(self.fold(from), self.fold(to))]
    }
}
