//! Maintenance request stage workflow
//!
//! One shared, pure transition function used by every entry point that moves a
//! request between stages. Role checks and the same-stage no-op are handled by
//! the calling service; this module only knows the graph:
//!
//! ```text
//! New ──► InProgress ──► Repaired
//!   │         │              │
//!   └─────────┴──────────────┴──► Scrap (terminal)
//! ```

use crate::models::enums::RequestStage;

/// Whether the workflow permits moving a request from `from` to `to`.
///
/// Scrap is terminal: nothing leaves it. Scrap is reachable from every
/// non-terminal stage. The forward path is New -> InProgress -> Repaired;
/// every other pair is rejected.
pub fn is_valid_transition(from: RequestStage, to: RequestStage) -> bool {
    use RequestStage::*;
    matches!(
        (from, to),
        (New, InProgress) | (InProgress, Repaired) | (New, Scrap) | (InProgress, Scrap) | (Repaired, Scrap)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequestStage::*;

    const ALL: [RequestStage; 4] = [New, InProgress, Repaired, Scrap];

    #[test]
    fn test_forward_path() {
        assert!(is_valid_transition(New, InProgress));
        assert!(is_valid_transition(InProgress, Repaired));
    }

    #[test]
    fn test_scrap_reachable_from_any_non_terminal_stage() {
        assert!(is_valid_transition(New, Scrap));
        assert!(is_valid_transition(InProgress, Scrap));
        assert!(is_valid_transition(Repaired, Scrap));
    }

    #[test]
    fn test_scrap_is_terminal() {
        for to in ALL {
            assert!(!is_valid_transition(Scrap, to), "Scrap -> {} must be rejected", to);
        }
    }

    #[test]
    fn test_repaired_only_leads_to_scrap() {
        for to in ALL {
            assert_eq!(is_valid_transition(Repaired, to), to == Scrap);
        }
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!is_valid_transition(InProgress, New));
        assert!(!is_valid_transition(Repaired, New));
        assert!(!is_valid_transition(Repaired, InProgress));
    }

    #[test]
    fn test_skipping_in_progress_rejected() {
        assert!(!is_valid_transition(New, Repaired));
    }

    #[test]
    fn test_same_stage_is_not_a_graph_edge() {
        // The service treats same-stage writes as a no-op before consulting
        // the graph; the graph itself has no self-edges.
        for stage in ALL {
            assert!(!is_valid_transition(stage, stage));
        }
    }
}
