//! Reconciliation of one network ACL against its desired state

use crate::action::{Action, ApplyResult, Plan};
use crate::diff::{dedup_rules, diff_rules};
use crate::error::{CloudError, Result};
use crate::model::{Acl, AclOutcome, DesiredAcl, NAME_TAG, resolve_rules};
use crate::provider::AclProvider;
use std::collections::BTreeMap;

/// Reconciles a single ACL, identified by (VPC id, `Name` tag)
///
/// Build one per invocation. The discovery result is cached for the lifetime
/// of the value and kept in sync with the ACL it creates or deletes.
pub struct Reconciler<'a, P: AclProvider + ?Sized> {
    provider: &'a P,
    desired: DesiredAcl,
    discovered: Option<Option<Acl>>,
}

impl<'a, P: AclProvider + ?Sized> Reconciler<'a, P> {
    pub fn new(provider: &'a P, desired: DesiredAcl) -> Self {
        Self {
            provider,
            desired,
            discovered: None,
        }
    }

    /// Locate the live ACL for the desired (VPC, name) pair.
    ///
    /// Fails with [`CloudError::DuplicateAcl`] when more than one matches.
    pub async fn find_acl(&mut self) -> Result<Option<&Acl>> {
        if self.discovered.is_none() {
            let mut found = self
                .provider
                .list_acls(&self.desired.vpc_id, &self.desired.name)
                .await?;

            if found.len() > 1 {
                return Err(CloudError::DuplicateAcl {
                    name: self.desired.name.clone(),
                    vpc_id: self.desired.vpc_id.clone(),
                });
            }

            let acl = found.pop();
            tracing::debug!(
                "Discovered network ACL '{}' in {}: {}",
                self.desired.name,
                self.desired.vpc_id,
                acl.as_ref().map(|a| a.id.as_str()).unwrap_or("none")
            );
            self.discovered = Some(acl);
        }

        Ok(self.discovered.as_ref().and_then(Option::as_ref))
    }

    /// Tags to apply: `Name` first, then the desired tags in order, later
    /// keys overwriting earlier ones.
    pub fn desired_tags(&self) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        tags.insert(NAME_TAG.to_string(), self.desired.name.clone());

        for tag in &self.desired.tags {
            if tag.key == NAME_TAG && tag.value != self.desired.name {
                tracing::warn!(
                    "Desired tag '{}={}' overwrites the ACL name '{}'; later runs will not find this ACL by that name",
                    tag.key,
                    tag.value,
                    self.desired.name
                );
            }
            tags.insert(tag.key.clone(), tag.value.clone());
        }

        tags
    }

    /// Plan the calls that bring the ACL to the desired rules and tags.
    ///
    /// Rules are validated before discovery, so invalid input never reaches
    /// the provider.
    pub async fn plan_present(&mut self) -> Result<Plan> {
        let rules = dedup_rules(resolve_rules(&self.desired.rules)?);
        let tags = self.desired_tags();

        let plan = match self.find_acl().await?.cloned() {
            None => {
                let mut actions = vec![
                    Action::CreateAcl {
                        vpc_id: self.desired.vpc_id.clone(),
                    },
                    Action::ApplyTags { tags },
                ];
                actions.extend(rules.into_iter().map(Action::CreateEntry));
                Plan::new(None, actions)
            }
            Some(acl) => {
                let mut actions = diff_rules(&rules, &acl.entries);
                actions.push(Action::ApplyTags { tags });
                Plan::new(Some(acl.id), actions)
            }
        };

        tracing::debug!("Planned '{}': {}", self.desired.name, plan.summary());
        Ok(plan)
    }

    /// Plan the deletion of the ACL, empty when there is nothing to delete.
    pub async fn plan_absent(&mut self) -> Result<Plan> {
        let plan = match self.find_acl().await? {
            None => Plan::empty(),
            Some(acl) => Plan::new(
                Some(acl.id.clone()),
                vec![Action::DeleteAcl {
                    acl_id: acl.id.clone(),
                }],
            ),
        };
        Ok(plan)
    }

    /// Converge the live ACL to the desired state, creating it if needed.
    ///
    /// `changed` is only reported for a newly created ACL; rule and tag
    /// updates on an existing ACL leave it `false`.
    pub async fn ensure_present(&mut self) -> Result<AclOutcome> {
        let plan = self.plan_present().await?;
        let result = self.apply(&plan).await?;

        Ok(AclOutcome {
            changed: result.created,
            id: result.acl_id.unwrap_or_default(),
            name: self.desired.name.clone(),
            entries: Some(self.desired.rules.clone()),
        })
    }

    /// Delete the ACL if it exists.
    pub async fn ensure_absent(&mut self) -> Result<AclOutcome> {
        let plan = self.plan_absent().await?;
        let result = self.apply(&plan).await?;

        Ok(AclOutcome {
            changed: result.deleted,
            id: plan.acl_id.unwrap_or_default(),
            name: self.desired.name.clone(),
            entries: None,
        })
    }

    /// Execute a plan one provider call at a time, stopping at the first error.
    pub async fn apply(&mut self, plan: &Plan) -> Result<ApplyResult> {
        let mut result = ApplyResult {
            acl_id: plan.acl_id.clone(),
            ..Default::default()
        };

        for action in &plan.actions {
            tracing::info!("{}", action);

            match action {
                Action::CreateAcl { vpc_id } => {
                    let acl = self.provider.create_acl(vpc_id).await?;
                    tracing::info!("Created network ACL {}", acl.id);
                    result.acl_id = Some(acl.id.clone());
                    result.created = true;
                    self.discovered = Some(Some(acl));
                }
                Action::ApplyTags { tags } => {
                    let acl_id = target_id(&result, &self.desired.name)?;
                    self.provider.add_tags(acl_id, tags).await?;
                }
                Action::CreateEntry(entry) => {
                    let acl_id = target_id(&result, &self.desired.name)?;
                    self.provider.create_entry(acl_id, entry).await?;
                }
                Action::ReplaceEntry(entry) => {
                    let acl_id = target_id(&result, &self.desired.name)?;
                    self.provider.replace_entry(acl_id, entry).await?;
                }
                Action::DeleteEntry { number, direction } => {
                    let acl_id = target_id(&result, &self.desired.name)?;
                    self.provider
                        .delete_entry(acl_id, *number, *direction)
                        .await?;
                }
                Action::DeleteAcl { acl_id } => {
                    result.deleted = self.provider.delete_acl(acl_id).await?;
                    if result.deleted {
                        self.discovered = Some(None);
                    }
                }
            }
        }

        Ok(result)
    }
}

fn target_id<'r>(result: &'r ApplyResult, name: &str) -> Result<&'r str> {
    result
        .acl_id
        .as_deref()
        .ok_or_else(|| CloudError::ResourceNotFound(format!("network ACL '{}'", name)))
}
