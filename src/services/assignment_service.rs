use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use crate::{api::middleware::error::ApiResult, database::Database, models::Operator};

/// Source of randomness for operator selection. Injected so tests can drive
/// the lottery with a seeded or scripted generator.
pub trait RandomSource: Send + Sync {
    /// Uniform draw from 1..=total. Callers guarantee total >= 1.
    fn draw_weight(&self, total: i64) -> i64;

    /// Uniform index draw from 0..len. Callers guarantee len >= 1.
    fn draw_index(&self, len: usize) -> usize;
}

/// Default source backed by the thread-local RNG.
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn draw_weight(&self, total: i64) -> i64 {
        rand::thread_rng().gen_range(1..=total)
    }

    fn draw_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

#[derive(Clone)]
pub struct AssignmentService {
    db: Database,
    random: Arc<dyn RandomSource>,
}

impl AssignmentService {
    pub fn new(db: Database, random: Arc<dyn RandomSource>) -> Self {
        Self { db, random }
    }

    /// Operators currently able to take a contact from this source.
    pub async fn available_operators(&self, source_id: i64) -> ApiResult<Vec<Operator>> {
        self.db.available_operators(source_id).await
    }

    /// Pick an operator for a contact from this source, or None when nobody
    /// is eligible. Stateless: every call re-queries eligibility and weights
    /// and runs a fresh weighted lottery; there is no round-robin memory.
    ///
    /// The lottery is integer-only: draw r in 1..=total, walk the candidates
    /// in eligibility-query order accumulating weights, take the first whose
    /// running sum reaches r. Each candidate wins with probability
    /// weight/total, and the inclusive comparison keeps the boundary
    /// deterministic under a seeded generator.
    pub async fn select_operator(&self, source_id: i64) -> ApiResult<Option<i64>> {
        let available = self.db.available_operators(source_id).await?;
        if available.is_empty() {
            tracing::warn!("No available operators for source: source_id={}", source_id);
            return Ok(None);
        }

        let weights = self.db.weights_for_source(source_id).await?;
        let weight_by_operator: HashMap<i64, i64> =
            weights.iter().map(|w| (w.operator_id, w.weight)).collect();

        let candidates: Vec<&Operator> = available
            .iter()
            .filter(|op| weight_by_operator.contains_key(&op.id))
            .collect();

        if candidates.is_empty() {
            tracing::warn!("No weighted operators for source: source_id={}", source_id);
            return Ok(None);
        }

        let total: i64 = candidates.iter().map(|op| weight_by_operator[&op.id]).sum();

        // Weights are schema-constrained >= 1, so a zero total only happens
        // when rows were edited behind the API. Fall back to a uniform pick.
        if total == 0 {
            let picked = candidates[self.random.draw_index(candidates.len())];
            return Ok(Some(picked.id));
        }

        let r = self.random.draw_weight(total);
        let mut running = 0i64;
        for operator in &candidates {
            running += weight_by_operator[&operator.id];
            if running >= r {
                return Ok(Some(operator.id));
            }
        }

        // Unreachable with an integer draw in 1..=total; guard kept for the
        // day someone widens the draw range.
        Ok(Some(candidates[0].id))
    }
}
