//! Deduplication and ranking of provider candidates by content hash.

use std::collections::HashSet;

use crate::config::ScoringConfig;

use super::normalize::{classify_quality, extract_info_hash, Quality};
use super::{Candidate, ResolvedItem};

/// Deduplicate candidates by content hash.
///
/// Candidates are taken in the order given (provider dispatch order, then
/// each provider's own order). The first candidate seen for a hash wins;
/// later ones are discarded without merging seeders or titles. Candidates
/// without a resolvable hash are dropped. Scores are left at zero.
pub fn deduplicate(candidates: Vec<Candidate>) -> Vec<ResolvedItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items = Vec::new();

    for (index, c) in candidates.into_iter().enumerate() {
        let Some(hash) = extract_info_hash(&c.magnet) else {
            continue;
        };
        if !seen.insert(hash.clone()) {
            continue;
        }
        items.push(ResolvedItem {
            provider: c.provider,
            title: c.title,
            magnet: c.magnet,
            size: c.size,
            seeders: c.seeders,
            info_hash: hash,
            score: 0,
            discovery_index: index,
        });
    }

    items
}

/// Heuristic score: trust bonus, quality bonus and capped seeders.
///
/// Configured weights are unbounded, so the sum saturates at `u32::MAX`.
pub fn score(item: &ResolvedItem, weights: &ScoringConfig) -> u32 {
    let trust = if item.provider == weights.trusted_provider {
        weights.trusted_bonus
    } else {
        0
    };
    let quality = match classify_quality(&item.title) {
        Quality::Uhd => weights.uhd_bonus,
        Quality::FullHd => weights.full_hd_bonus,
        _ => 0,
    };
    trust
        .saturating_add(quality)
        .saturating_add(item.seeders.min(weights.seeder_cap))
}

/// Score every item and sort by descending score.
///
/// The sort is stable, and items arrive in discovery order, so equal
/// scores keep their discovery order.
pub fn rank(mut items: Vec<ResolvedItem>, weights: &ScoringConfig) -> Vec<ResolvedItem> {
    for item in &mut items {
        item.score = score(item, weights);
    }
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items
}
