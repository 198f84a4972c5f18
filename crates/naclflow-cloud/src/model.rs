//! Desired and live network ACL types

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Rule number of the provider-managed catch-all deny rule.
///
/// Never created, replaced or deleted by naclflow.
pub const RESERVED_RULE_NUMBER: i32 = 32767;

/// Tag key used as the logical identity of an ACL inside its VPC
pub const NAME_TAG: &str = "Name";

/// Traffic direction a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ingress,
    Egress,
}

impl Direction {
    /// Both directions, in the order they are reconciled
    pub const ALL: [Direction; 2] = [Direction::Ingress, Direction::Egress];

    pub fn is_egress(self) -> bool {
        matches!(self, Direction::Egress)
    }

    pub fn from_egress(egress: bool) -> Self {
        if egress {
            Direction::Egress
        } else {
            Direction::Ingress
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Ingress => write!(f, "ingress"),
            Direction::Egress => write!(f, "egress"),
        }
    }
}

/// Protocols accepted in a desired rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Icmp,
    Tcp,
    Udp,
    All,
}

impl Protocol {
    /// Provider protocol number
    pub fn code(self) -> i32 {
        match self {
            Protocol::Icmp => 1,
            Protocol::Tcp => 6,
            Protocol::Udp => 17,
            Protocol::All => -1,
        }
    }
}

impl FromStr for Protocol {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ICMP" => Ok(Protocol::Icmp),
            "TCP" => Ok(Protocol::Tcp),
            "UDP" => Ok(Protocol::Udp),
            "ALL" => Ok(Protocol::All),
            _ => Err(CloudError::InvalidProtocol(s.to_string())),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Icmp => write!(f, "ICMP"),
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
            Protocol::All => write!(f, "ALL"),
        }
    }
}

/// Inclusive port bounds of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: i32,
    pub to: i32,
}

/// One entry of the desired rule list, as written by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRule {
    /// Rule priority, unique within its direction
    pub number: i32,

    pub direction: Direction,

    /// Protocol name (ICMP, TCP, UDP, ALL)
    pub protocol: String,

    /// Provider action, typically "allow" or "deny"
    pub action: String,

    pub cidr_block: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_range: Option<PortRange>,
}

impl DesiredRule {
    /// Resolve the protocol name and check the rule number.
    pub fn resolve(&self) -> Result<RuleEntry> {
        if self.number >= RESERVED_RULE_NUMBER {
            return Err(CloudError::ReservedRuleNumber(self.number));
        }

        Ok(RuleEntry {
            number: self.number,
            direction: self.direction,
            protocol: self.protocol.parse()?,
            action: self.action.clone(),
            cidr_block: self.cidr_block.clone(),
            port_range: self.port_range,
        })
    }
}

/// A validated rule ready to be sent to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub number: i32,
    pub direction: Direction,
    pub protocol: Protocol,
    pub action: String,
    pub cidr_block: String,
    pub port_range: Option<PortRange>,
}

impl std::fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} #{} {} {} {}",
            self.direction, self.number, self.action, self.protocol, self.cidr_block
        )?;
        if let Some(range) = self.port_range {
            write!(f, " {}-{}", range.from, range.to)?;
        }
        Ok(())
    }
}

/// Resolve a whole desired rule list, failing on the first invalid rule.
pub fn resolve_rules(rules: &[DesiredRule]) -> Result<Vec<RuleEntry>> {
    rules.iter().map(DesiredRule::resolve).collect()
}

/// A key/value tag pair from the desired state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Desired state of a single ACL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredAcl {
    /// Logical name, stored in the `Name` tag
    pub name: String,

    pub vpc_id: String,

    #[serde(default)]
    pub rules: Vec<DesiredRule>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A rule entry discovered on a live ACL
///
/// Only `number` and `direction` take part in the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRuleEntry {
    pub number: i32,
    pub direction: Direction,
    pub protocol: Option<String>,
    pub action: Option<String>,
    pub cidr_block: Option<String>,
}

impl LiveRuleEntry {
    pub fn new(number: i32, direction: Direction) -> Self {
        Self {
            number,
            direction,
            protocol: None,
            action: None,
            cidr_block: None,
        }
    }
}

impl std::fmt::Display for LiveRuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.direction, self.number)?;
        if let Some(action) = &self.action {
            write!(f, " {}", action)?;
        }
        if let Some(protocol) = &self.protocol {
            write!(f, " proto {}", protocol)?;
        }
        if let Some(cidr_block) = &self.cidr_block {
            write!(f, " {}", cidr_block)?;
        }
        Ok(())
    }
}

/// A live network ACL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    /// Provider-assigned id
    pub id: String,

    pub vpc_id: String,

    pub tags: BTreeMap<String, String>,

    pub entries: Vec<LiveRuleEntry>,
}

impl Acl {
    pub fn name(&self) -> Option<&str> {
        self.tags.get(NAME_TAG).map(String::as_str)
    }

    /// Rule numbers currently present in one direction
    pub fn rule_numbers(&self, direction: Direction) -> impl Iterator<Item = i32> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.direction == direction)
            .map(|e| e.number)
    }

    /// The live entry with the given number and direction
    pub fn entry(&self, number: i32, direction: Direction) -> Option<&LiveRuleEntry> {
        self.entries
            .iter()
            .find(|e| e.number == number && e.direction == direction)
    }
}

/// Result record of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclOutcome {
    pub changed: bool,

    /// ACL id, empty when no ACL exists
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<DesiredRule>>,
}
