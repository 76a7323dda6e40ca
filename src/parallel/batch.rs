//! Parallel seed-sweep batch simulation. Runs the same battle config across a
//! contiguous seed range and aggregates outcome statistics for balancing work.

use rayon::prelude::*;
use serde::Serialize;

use crate::parallel::pool::WorkerPool;
use crate::sim::runner::{run_battle, BattleConfig, BattleOutcome, BattleReport};

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub battles: usize,
    pub victories: usize,
    pub defeats: usize,
    pub turn_limits: usize,
    pub win_rate: f64,
    pub avg_turns: f64,
    pub avg_survivors: f64,
    pub avg_xp_pool: f64,
    pub base_seed: u64,
}

impl BatchSummary {
    fn from_reports(base_seed: u64, reports: &[BattleReport]) -> Self {
        let battles = reports.len();
        let victories = reports
            .iter()
            .filter(|r| r.outcome == BattleOutcome::Victory)
            .count();
        let defeats = reports
            .iter()
            .filter(|r| r.outcome == BattleOutcome::Defeat)
            .count();
        let turn_limits = battles - victories - defeats;
        let denom = battles.max(1) as f64;
        Self {
            battles,
            victories,
            defeats,
            turn_limits,
            win_rate: victories as f64 / denom,
            avg_turns: reports.iter().map(|r| r.turns as f64).sum::<f64>() / denom,
            avg_survivors: reports.iter().map(|r| r.survivors as f64).sum::<f64>() / denom,
            avg_xp_pool: reports.iter().map(|r| r.award.pool as f64).sum::<f64>() / denom,
            base_seed,
        }
    }
}

/// Run `count` battles with seeds `base_seed..base_seed + count` in parallel
/// and aggregate the results. Deterministic per seed regardless of worker count.
pub fn run_battle_batch(
    config: &BattleConfig,
    count: usize,
    base_seed: u64,
    pool: &WorkerPool,
) -> BatchSummary {
    // Chunk the seed range so each parallel task amortizes the config clone.
    let ranges = batch_ranges(count, count.div_ceil(8));
    let reports: Vec<BattleReport> = pool.install(|| {
        ranges
            .into_par_iter()
            .flat_map_iter(|(start, end)| {
                let config = config.clone();
                (start..end).map(move |offset| {
                    let cfg = config.clone().with_seed(base_seed + offset as u64);
                    run_battle(&cfg)
                })
            })
            .collect()
    });
    BatchSummary::from_reports(base_seed, &reports)
}
