//! Deletes finances, cascading over recurrence groups behind a confirmation gate.

use tracing::{info, warn};
use uuid::Uuid;

use financer_domain::Finance;

use crate::{CoreError, LedgerStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The listed finances were removed and the removal was saved.
    Deleted { removed: Vec<Uuid> },
    /// The target belongs to a recurrence group; nothing was changed. Re-invoke with
    /// confirmation to remove the whole group.
    NeedsConfirmation { target: Uuid, group_size: usize },
    /// The target no longer exists.
    NoOp,
}

pub struct DeletionService;

impl DeletionService {
    pub fn delete(
        store: &mut dyn LedgerStore,
        target: Uuid,
        confirmed: bool,
    ) -> Result<DeleteOutcome, CoreError> {
        let finances = store.fetch_all()?;
        let Some(finance) = finances.iter().find(|finance| finance.id == target) else {
            return Ok(DeleteOutcome::NoOp);
        };

        let doomed = Self::blast_radius(&finances, finance);
        if Self::requires_confirmation(finance) && !confirmed {
            return Ok(DeleteOutcome::NeedsConfirmation {
                target,
                group_size: doomed.len(),
            });
        }

        let staged = doomed
            .iter()
            .try_for_each(|id| store.delete(*id))
            .and_then(|()| store.save());
        if let Err(err) = staged {
            warn!("delete of {} rolled back: {}", target, err);
            store.rollback();
            return Err(err);
        }

        info!(%target, removed = doomed.len(), "finance deleted");
        Ok(DeleteOutcome::Deleted { removed: doomed })
    }

    /// Periodical finances and members of a recurrence group take their whole group with them.
    pub fn requires_confirmation(finance: &Finance) -> bool {
        finance.is_periodical || finance.recurrence_group.is_some()
    }

    /// Ids removed when `target` is deleted: the target first, then its group peers.
    pub fn blast_radius(finances: &[Finance], target: &Finance) -> Vec<Uuid> {
        let mut ids = vec![target.id];
        if let Some(group) = target.recurrence_series() {
            ids.extend(
                finances
                    .iter()
                    .filter(|finance| {
                        finance.id != target.id && finance.recurrence_series() == Some(group)
                    })
                    .map(|finance| finance.id),
            );
        }
        ids
    }
}
