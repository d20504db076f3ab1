//! Blanket re-check of a realm's quest objectives.

use tq_core::{Completion, Game, Objective, Realm};
use tracing::{debug, info, warn};

use crate::plugin::{PluginKey, PluginRegistry};

/// One objective that changed state during an evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveOutcome {
    /// Position of the objective in `realm.objectives`.
    pub index: usize,
    /// The objective after evaluation.
    pub objective: Objective,
}

impl ObjectiveOutcome {
    /// Whether this outcome marks the objective complete.
    pub fn is_completed(&self) -> bool {
        self.objective.completed.is_satisfied()
    }
}

/// Evaluate every open objective of `realm` and record the results.
///
/// Satisfied objectives and the implicit start objective are skipped. An
/// objective whose module has no predicate, or whose predicate fails, is
/// left untouched. A predicate returning `None` marks a never-evaluated
/// objective as unsatisfied. Returns the objectives that changed, newly
/// completed ones included.
pub async fn evaluate(
    registry: &PluginRegistry,
    game: &Game,
    realm: &mut Realm,
    player_name: &str,
) -> Vec<ObjectiveOutcome> {
    let mut results = Vec::new();
    for (index, objective) in realm.objectives.iter().enumerate() {
        if objective.completed.is_satisfied() || objective.is_start() {
            continue;
        }
        let key = PluginKey::of_objective(objective);
        let Some(handler) = registry.resolve_objective(&key) else {
            debug!(objective = %objective.kind, module = %key, "objective has no predicate");
            continue;
        };
        match handler.evaluate(objective, game, realm, player_name).await {
            Ok(Some(updated)) => results.push((index, updated)),
            Ok(None) => {
                if objective.completed.is_unevaluated() {
                    let mut checked = objective.clone();
                    checked.completed = Completion::Unsatisfied;
                    results.push((index, checked));
                }
            }
            Err(e) => warn!(objective = %objective.kind, error = %e, "objective predicate failed"),
        }
    }

    let mut outcomes = Vec::with_capacity(results.len());
    for (index, objective) in results {
        if let Some(slot) = realm.objectives.get_mut(index) {
            if objective.completed.is_satisfied() {
                info!(objective = %objective.kind, "objective completed");
            }
            *slot = objective.clone();
            outcomes.push(ObjectiveOutcome { index, objective });
        }
    }
    outcomes
}
