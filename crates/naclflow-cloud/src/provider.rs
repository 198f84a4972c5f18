//! Network ACL provider trait definition

use crate::error::Result;
use crate::model::{Acl, Direction, RuleEntry};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Network ACL provider abstraction trait
///
/// Every call maps to exactly one provider API request. Implementations must
/// not retry or batch; the reconciler relies on each call being observable
/// on its own.
#[async_trait]
pub trait AclProvider: Send + Sync {
    /// Returns the provider name (e.g., "aws-ec2")
    fn name(&self) -> &str;

    /// List ACLs in `vpc_id` whose `Name` tag equals `name`
    async fn list_acls(&self, vpc_id: &str, name: &str) -> Result<Vec<Acl>>;

    /// Create an empty ACL in `vpc_id`
    async fn create_acl(&self, vpc_id: &str) -> Result<Acl>;

    /// Add a rule entry that does not exist yet
    async fn create_entry(&self, acl_id: &str, entry: &RuleEntry) -> Result<()>;

    /// Overwrite an existing rule entry with the same number and direction
    async fn replace_entry(&self, acl_id: &str, entry: &RuleEntry) -> Result<()>;

    /// Delete the rule entry identified by number and direction
    async fn delete_entry(&self, acl_id: &str, number: i32, direction: Direction) -> Result<()>;

    /// Delete the ACL, returning whether the provider reported success
    async fn delete_acl(&self, acl_id: &str) -> Result<bool>;

    /// Create or overwrite tags on a resource
    async fn add_tags(&self, resource_id: &str, tags: &BTreeMap<String, String>) -> Result<()>;
}
