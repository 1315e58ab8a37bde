//! Headline insight classification
//!
//! Picks which single observation the dashboard leads with. Only the data
//! is produced here; wording belongs to the presentation layer.

use crate::average::{percent, round_to};
use crate::snapshot::AggregateSnapshot;
use serde::Serialize;

/// Share (percent) below which a hook counts as underused
pub const UNDERUSED_SHARE: f64 = 5.0;

/// CTA average below which CTAs count as weak
pub const WEAK_CTA_THRESHOLD: f64 = 5.0;

/// Headline observation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    /// Curiosity hooks are rare among analyzed pins
    CuriosityUnderused {
        /// Curiosity share of all hooks, one decimal
        share: f64,
    },
    /// Average CTA strength is low
    WeakCtas {
        /// Average CTA strength
        average: f64,
    },
    /// One hook technique leads
    HookDominates {
        /// Leading hook
        hook: String,
        /// Its whole-number share of all hooks
        share: f64,
    },
}

/// Classify the headline insight; `None` when nothing was analyzed
#[must_use]
pub fn classify(snapshot: &AggregateSnapshot) -> Option<Insight> {
    if snapshot.analyzed_pins == 0 {
        return None;
    }
    let total_hooks: usize = snapshot.hook_distribution.values().sum();
    let curiosity = ["Curiosity", "curiosity"]
        .iter()
        .filter_map(|k| snapshot.hook_distribution.get(*k).copied())
        .find(|c| *c > 0)
        .unwrap_or(0);

    #[allow(clippy::cast_precision_loss)]
    let curiosity_share = if total_hooks == 0 {
        0.0
    } else {
        round_to(curiosity as f64 / total_hooks as f64 * 100.0, 1)
    };

    if curiosity_share < UNDERUSED_SHARE {
        return Some(Insight::CuriosityUnderused {
            share: curiosity_share,
        });
    }
    if let Some(average) = snapshot.avg_cta_strength.value() {
        if average < WEAK_CTA_THRESHOLD {
            return Some(Insight::WeakCtas { average });
        }
    }
    let top = snapshot.ranked_hooks().into_iter().next()?;
    Some(Insight::HookDominates {
        share: percent(top.count, total_hooks),
        hook: top.key,
    })
}
