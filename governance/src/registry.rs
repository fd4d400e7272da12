//! Proposal storage: the only place proposals and vote receipts are created.

use crate::proposal::{Proposal, ProposalId, Receipt, Support, Tally};
use crate::GovernanceError;
use gavel_types::{Action, Principal, Tick, Weight};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Owns every proposal of one governor together with its receipts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalRegistry {
    proposals: BTreeMap<ProposalId, Proposal>,
    /// Per-proposal receipt set keyed by voter.
    receipts: HashMap<ProposalId, HashMap<Principal, Receipt>>,
    /// Identifier handed out by the next `create`.
    next_id: u64,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self {
            proposals: BTreeMap::new(),
            receipts: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of identifiers allocated so far (the highest id in use).
    pub fn proposal_count(&self) -> u64 {
        self.next_id - 1
    }

    /// Skip past identifiers already used by another registry so that ids
    /// stay unique across a handoff. Never moves the counter backwards.
    pub fn continue_after(&mut self, count: u64) {
        let next = count.saturating_add(1);
        if next > self.next_id {
            self.next_id = next;
        }
    }

    pub fn get(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    /// Store a new proposal. Callers validate threshold and action shape first.
    pub fn create(
        &mut self,
        proposer: Principal,
        actions: Vec<Action>,
        description: String,
        now: Tick,
        voting_delay: u64,
        voting_period: u64,
    ) -> ProposalId {
        assert!(!actions.is_empty(), "proposal must carry at least one action");
        let id = ProposalId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("proposal id space exhausted");

        let start = now.after(voting_delay);
        let proposal = Proposal {
            id,
            proposer,
            actions,
            description,
            created_at: now,
            start,
            end: start.after(voting_period),
            tally: Tally::default(),
            eta: None,
            canceled: false,
            executed: false,
        };
        self.proposals.insert(id, proposal);
        id
    }

    pub fn receipt(&self, id: ProposalId, voter: &Principal) -> Option<&Receipt> {
        self.receipts.get(&id).and_then(|r| r.get(voter))
    }

    /// Create the receipt for `(id, voter)` and add `weight` to the tally.
    ///
    /// Both happen or neither does.
    pub fn record_vote(
        &mut self,
        id: ProposalId,
        voter: &Principal,
        support: Support,
        weight: Weight,
    ) -> Result<Receipt, GovernanceError> {
        if self.receipt(id, voter).is_some() {
            return Err(GovernanceError::AlreadyVoted {
                id,
                voter: voter.clone(),
            });
        }
        let proposal = self.get_mut(id)?;
        proposal.tally.add(support, weight);

        let receipt = Receipt {
            has_voted: true,
            support,
            weight,
        };
        self.receipts
            .entry(id)
            .or_default()
            .insert(voter.clone(), receipt);
        Ok(receipt)
    }

    pub fn set_eta(&mut self, id: ProposalId, eta: Tick) -> Result<(), GovernanceError> {
        self.get_mut(id)?.eta = Some(eta);
        Ok(())
    }

    pub fn set_executed(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        self.get_mut(id)?.executed = true;
        Ok(())
    }

    pub fn set_canceled(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        self.get_mut(id)?.canceled = true;
        Ok(())
    }
}

impl Default for ProposalRegistry {
    fn default() -> Self {
        Self::new()
    }
}
