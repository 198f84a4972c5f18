//! Action types for network ACL reconciliation

use crate::model::{Direction, RuleEntry};
use std::collections::BTreeMap;

/// A single provider call planned by the reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a new ACL in the VPC
    CreateAcl { vpc_id: String },

    /// Set the `Name` tag and the desired tags on the ACL
    ApplyTags { tags: BTreeMap<String, String> },

    /// Add a rule entry that is not present yet
    CreateEntry(RuleEntry),

    /// Overwrite an existing rule entry without comparing its content
    ReplaceEntry(RuleEntry),

    /// Remove a rule entry that is no longer desired
    DeleteEntry { number: i32, direction: Direction },

    /// Delete the whole ACL
    DeleteAcl { acl_id: String },
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::CreateAcl { .. } | Action::CreateEntry(_) => ActionType::Create,
            Action::ApplyTags { .. } | Action::ReplaceEntry(_) => ActionType::Update,
            Action::DeleteEntry { .. } | Action::DeleteAcl { .. } => ActionType::Delete,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::CreateAcl { vpc_id } => write!(f, "create network ACL in {}", vpc_id),
            Action::ApplyTags { tags } => {
                let pairs: Vec<String> = tags.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                write!(f, "tag network ACL [{}]", pairs.join(", "))
            }
            Action::CreateEntry(entry) => write!(f, "create entry {}", entry),
            Action::ReplaceEntry(entry) => write!(f, "replace entry {}", entry),
            Action::DeleteEntry { number, direction } => {
                write!(f, "delete entry {} #{}", direction, number)
            }
            Action::DeleteAcl { acl_id } => write!(f, "delete network ACL {}", acl_id),
        }
    }
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
        }
    }
}

/// Ordered provider calls needed to reach the desired state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Id of the ACL the plan operates on, `None` when it will be created
    pub acl_id: Option<String>,

    /// Actions in execution order
    pub actions: Vec<Action>,
}

impl Plan {
    pub fn new(acl_id: Option<String>, actions: Vec<Action>) -> Self {
        Self { acl_id, actions }
    }

    pub fn empty() -> Self {
        Self {
            acl_id: None,
            actions: Vec::new(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Get actions by type
    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type() == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
        }
    }
}

/// Summary of planned actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete",
            self.create, self.update, self.delete
        )
    }
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyResult {
    /// Id of the ACL after the plan ran, `None` if there was none
    pub acl_id: Option<String>,

    /// Whether a new ACL was created
    pub created: bool,

    /// Whether the provider reported the ACL as deleted
    pub deleted: bool,
}
