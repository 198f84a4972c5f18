//! naclflow network ACL reconciliation
//!
//! This crate holds the provider-independent part of naclflow: the desired
//! and live ACL model, the provider abstraction, and the reconciler that
//! turns one into the other with as few provider calls as the rule-number
//! identity allows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   naclflow CLI                   │
//! │             (nacl apply / plan)                  │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                naclflow-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │              Reconciler                  │   │
//! │  │  discovery → plan (rule diff) → apply    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait AclProvider { ... }               │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │    aws-ec2    │
//!           │   provider    │
//!           └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use naclflow_cloud::{DesiredAcl, Reconciler};
//!
//! let mut reconciler = Reconciler::new(&provider, desired);
//! let outcome = reconciler.ensure_present().await?;
//! println!("{} (changed: {})", outcome.id, outcome.changed);
//! ```

pub mod action;
pub mod diff;
pub mod error;
pub mod model;
pub mod provider;
pub mod reconciler;

// Re-exports
pub use action::{Action, ActionType, ApplyResult, Plan, PlanSummary};
pub use error::{CloudError, Result};
pub use model::{
    Acl, AclOutcome, DesiredAcl, DesiredRule, Direction, LiveRuleEntry, NAME_TAG, PortRange,
    Protocol, RESERVED_RULE_NUMBER, RuleEntry, Tag, resolve_rules,
};
pub use provider::AclProvider;
pub use reconciler::Reconciler;
