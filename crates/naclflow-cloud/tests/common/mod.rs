use async_trait::async_trait;
use naclflow_cloud::{
    Acl, AclProvider, CloudError, DesiredAcl, DesiredRule, Direction, LiveRuleEntry, NAME_TAG,
    PortRange, RESERVED_RULE_NUMBER, Result, RuleEntry, Tag,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Provider call recorded by [`MemoryProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    CreateAcl,
    CreateEntry { number: i32, direction: Direction },
    ReplaceEntry { number: i32, direction: Direction },
    DeleteEntry { number: i32, direction: Direction },
    DeleteAcl,
    AddTags,
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::List)
    }
}

type FailPredicate = Box<dyn Fn(&Call) -> bool + Send + Sync>;

/// In-memory provider that behaves like EC2 for the calls naclflow makes
pub struct MemoryProvider {
    acls: Mutex<Vec<Acl>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
    fail_on: Option<FailPredicate>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            acls: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            fail_on: None,
        }
    }

    pub fn with_acl(self, acl: Acl) -> Self {
        self.acls.lock().unwrap().push(acl);
        self
    }

    /// Make every call matching `predicate` fail after being recorded
    #[allow(dead_code)]
    pub fn fail_on(mut self, predicate: impl Fn(&Call) -> bool + Send + Sync + 'static) -> Self {
        self.fail_on = Some(Box::new(predicate));
        self
    }

    pub fn acls(&self) -> Vec<Acl> {
        self.acls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn acl(&self, id: &str) -> Acl {
        self.acls()
            .into_iter()
            .find(|a| a.id == id)
            .expect("ACL should exist")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    #[allow(dead_code)]
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        let fail = self.fail_on.as_ref().is_some_and(|p| p(&call));
        self.calls.lock().unwrap().push(call.clone());
        if fail {
            return Err(CloudError::ApiError(format!("injected failure on {:?}", call)));
        }
        Ok(())
    }

    fn with_acl_mut<T>(&self, acl_id: &str, f: impl FnOnce(&mut Acl) -> Result<T>) -> Result<T> {
        let mut acls = self.acls.lock().unwrap();
        let acl = acls
            .iter_mut()
            .find(|a| a.id == acl_id)
            .ok_or_else(|| CloudError::ApiError(format!("InvalidNetworkAclID.NotFound: {}", acl_id)))?;
        f(acl)
    }
}

fn live_entry(entry: &RuleEntry) -> LiveRuleEntry {
    LiveRuleEntry {
        number: entry.number,
        direction: entry.direction,
        protocol: Some(entry.protocol.code().to_string()),
        action: Some(entry.action.clone()),
        cidr_block: Some(entry.cidr_block.clone()),
    }
}

/// The catch-all deny entry EC2 adds to every ACL
pub fn default_deny(direction: Direction) -> LiveRuleEntry {
    LiveRuleEntry {
        number: RESERVED_RULE_NUMBER,
        direction,
        protocol: Some("-1".to_string()),
        action: Some("deny".to_string()),
        cidr_block: Some("0.0.0.0/0".to_string()),
    }
}

#[async_trait]
impl AclProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_acls(&self, vpc_id: &str, name: &str) -> Result<Vec<Acl>> {
        self.record(Call::List)?;
        Ok(self
            .acls()
            .into_iter()
            .filter(|a| a.vpc_id == vpc_id && a.name() == Some(name))
            .collect())
    }

    async fn create_acl(&self, vpc_id: &str) -> Result<Acl> {
        self.record(Call::CreateAcl)?;
        let mut next_id = self.next_id.lock().unwrap();
        let acl = Acl {
            id: format!("acl-{:08x}", *next_id),
            vpc_id: vpc_id.to_string(),
            tags: BTreeMap::new(),
            entries: vec![default_deny(Direction::Ingress), default_deny(Direction::Egress)],
        };
        *next_id += 1;
        self.acls.lock().unwrap().push(acl.clone());
        Ok(acl)
    }

    async fn create_entry(&self, acl_id: &str, entry: &RuleEntry) -> Result<()> {
        self.record(Call::CreateEntry {
            number: entry.number,
            direction: entry.direction,
        })?;
        self.with_acl_mut(acl_id, |acl| {
            if acl
                .entries
                .iter()
                .any(|e| e.number == entry.number && e.direction == entry.direction)
            {
                return Err(CloudError::ApiError(format!(
                    "NetworkAclEntryAlreadyExists: {}",
                    entry
                )));
            }
            acl.entries.push(live_entry(entry));
            Ok(())
        })
    }

    async fn replace_entry(&self, acl_id: &str, entry: &RuleEntry) -> Result<()> {
        self.record(Call::ReplaceEntry {
            number: entry.number,
            direction: entry.direction,
        })?;
        self.with_acl_mut(acl_id, |acl| {
            let existing = acl
                .entries
                .iter_mut()
                .find(|e| e.number == entry.number && e.direction == entry.direction)
                .ok_or_else(|| {
                    CloudError::ApiError(format!("InvalidNetworkAclEntry.NotFound: {}", entry))
                })?;
            *existing = live_entry(entry);
            Ok(())
        })
    }

    async fn delete_entry(&self, acl_id: &str, number: i32, direction: Direction) -> Result<()> {
        self.record(Call::DeleteEntry { number, direction })?;
        self.with_acl_mut(acl_id, |acl| {
            if number == RESERVED_RULE_NUMBER {
                return Err(CloudError::ApiError(
                    "InvalidParameterValue: default rule cannot be deleted".to_string(),
                ));
            }
            let before = acl.entries.len();
            acl.entries
                .retain(|e| !(e.number == number && e.direction == direction));
            if acl.entries.len() == before {
                return Err(CloudError::ApiError(format!(
                    "InvalidNetworkAclEntry.NotFound: {} #{}",
                    direction, number
                )));
            }
            Ok(())
        })
    }

    async fn delete_acl(&self, acl_id: &str) -> Result<bool> {
        self.record(Call::DeleteAcl)?;
        let mut acls = self.acls.lock().unwrap();
        let before = acls.len();
        acls.retain(|a| a.id != acl_id);
        Ok(acls.len() < before)
    }

    async fn add_tags(&self, resource_id: &str, tags: &BTreeMap<String, String>) -> Result<()> {
        self.record(Call::AddTags)?;
        self.with_acl_mut(resource_id, |acl| {
            acl.tags
                .extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
            Ok(())
        })
    }
}

pub fn rule(number: i32, direction: Direction, protocol: &str) -> DesiredRule {
    DesiredRule {
        number,
        direction,
        protocol: protocol.to_string(),
        action: "allow".to_string(),
        cidr_block: "10.0.0.0/16".to_string(),
        port_range: Some(PortRange { from: 443, to: 443 }),
    }
}

pub fn desired(rules: Vec<DesiredRule>, tags: Vec<Tag>) -> DesiredAcl {
    DesiredAcl {
        name: "web".to_string(),
        vpc_id: "vpc-0123".to_string(),
        rules,
        tags,
    }
}

/// A live ACL named "web" in "vpc-0123" with the given entries plus the
/// default deny rules
pub fn live_acl(id: &str, ingress: &[i32], egress: &[i32]) -> Acl {
    let mut entries: Vec<LiveRuleEntry> = ingress
        .iter()
        .map(|&n| LiveRuleEntry::new(n, Direction::Ingress))
        .chain(egress.iter().map(|&n| LiveRuleEntry::new(n, Direction::Egress)))
        .collect();
    entries.push(default_deny(Direction::Ingress));
    entries.push(default_deny(Direction::Egress));

    Acl {
        id: id.to_string(),
        vpc_id: "vpc-0123".to_string(),
        tags: BTreeMap::from([(NAME_TAG.to_string(), "web".to_string())]),
        entries,
    }
}
