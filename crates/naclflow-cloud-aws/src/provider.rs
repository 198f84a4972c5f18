//! EC2 network ACL provider implementation

use crate::error::{AwsError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{Filter, NetworkAcl, NetworkAclEntry, PortRange, RuleAction, Tag};
use naclflow_cloud::{
    Acl, AclProvider, CloudError, Direction, LiveRuleEntry, NAME_TAG, RuleEntry,
};
use std::collections::BTreeMap;

/// Options used to build the SDK configuration
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Explicit region, takes precedence over the environment
    pub region: Option<String>,

    /// Named profile from the shared config files
    pub profile: Option<String>,
}

/// EC2 network ACL provider
pub struct Ec2AclProvider {
    client: Client,
    region: String,
}

impl Ec2AclProvider {
    /// Load the SDK configuration and build a client.
    ///
    /// Fails with [`AwsError::MissingRegion`] before any API call when no
    /// region can be resolved.
    pub async fn connect(options: &ConnectOptions) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;
        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .ok_or(AwsError::MissingRegion)?;

        tracing::debug!("Using EC2 endpoint in {}", region);
        Ok(Self {
            client: Client::new(&sdk_config),
            region,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

fn api_error(operation: &str, err: impl std::error::Error) -> CloudError {
    CloudError::ApiError(format!("{} failed: {}", operation, DisplayErrorContext(err)))
}

#[async_trait]
impl AclProvider for Ec2AclProvider {
    fn name(&self) -> &str {
        "aws-ec2"
    }

    async fn list_acls(&self, vpc_id: &str, name: &str) -> naclflow_cloud::Result<Vec<Acl>> {
        let output = self
            .client
            .describe_network_acls()
            .filters(Filter::builder().name("vpc-id").values(vpc_id).build())
            .filters(
                Filter::builder()
                    .name(format!("tag:{}", NAME_TAG))
                    .values(name)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| api_error("DescribeNetworkAcls", e))?;

        Ok(output.network_acls().iter().filter_map(to_acl).collect())
    }

    async fn create_acl(&self, vpc_id: &str) -> naclflow_cloud::Result<Acl> {
        let output = self
            .client
            .create_network_acl()
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(|e| api_error("CreateNetworkAcl", e))?;

        output.network_acl().and_then(to_acl).ok_or_else(|| {
            CloudError::ResourceNotFound(format!(
                "CreateNetworkAcl in {} returned no network ACL",
                vpc_id
            ))
        })
    }

    async fn create_entry(&self, acl_id: &str, entry: &RuleEntry) -> naclflow_cloud::Result<()> {
        self.client
            .create_network_acl_entry()
            .network_acl_id(acl_id)
            .rule_number(entry.number)
            .protocol(entry.protocol.code().to_string())
            .rule_action(RuleAction::from(entry.action.as_str()))
            .egress(entry.direction.is_egress())
            .cidr_block(&entry.cidr_block)
            .set_port_range(to_port_range(entry))
            .send()
            .await
            .map_err(|e| api_error("CreateNetworkAclEntry", e))?;
        Ok(())
    }

    async fn replace_entry(&self, acl_id: &str, entry: &RuleEntry) -> naclflow_cloud::Result<()> {
        self.client
            .replace_network_acl_entry()
            .network_acl_id(acl_id)
            .rule_number(entry.number)
            .protocol(entry.protocol.code().to_string())
            .rule_action(RuleAction::from(entry.action.as_str()))
            .egress(entry.direction.is_egress())
            .cidr_block(&entry.cidr_block)
            .set_port_range(to_port_range(entry))
            .send()
            .await
            .map_err(|e| api_error("ReplaceNetworkAclEntry", e))?;
        Ok(())
    }

    async fn delete_entry(
        &self,
        acl_id: &str,
        number: i32,
        direction: Direction,
    ) -> naclflow_cloud::Result<()> {
        self.client
            .delete_network_acl_entry()
            .network_acl_id(acl_id)
            .rule_number(number)
            .egress(direction.is_egress())
            .send()
            .await
            .map_err(|e| api_error("DeleteNetworkAclEntry", e))?;
        Ok(())
    }

    async fn delete_acl(&self, acl_id: &str) -> naclflow_cloud::Result<bool> {
        self.client
            .delete_network_acl()
            .network_acl_id(acl_id)
            .send()
            .await
            .map_err(|e| api_error("DeleteNetworkAcl", e))?;
        Ok(true)
    }

    async fn add_tags(
        &self,
        resource_id: &str,
        tags: &BTreeMap<String, String>,
    ) -> naclflow_cloud::Result<()> {
        let tags = tags
            .iter()
            .map(|(key, value)| Tag::builder().key(key).value(value).build())
            .collect();

        self.client
            .create_tags()
            .resources(resource_id)
            .set_tags(Some(tags))
            .send()
            .await
            .map_err(|e| api_error("CreateTags", e))?;
        Ok(())
    }
}

// ============ SDK conversions ============

fn to_acl(acl: &NetworkAcl) -> Option<Acl> {
    let id = acl.network_acl_id()?;

    Some(Acl {
        id: id.to_string(),
        vpc_id: acl.vpc_id().unwrap_or_default().to_string(),
        tags: acl
            .tags()
            .iter()
            .filter_map(|t| {
                Some((
                    t.key()?.to_string(),
                    t.value().unwrap_or_default().to_string(),
                ))
            })
            .collect(),
        entries: acl.entries().iter().filter_map(to_live_entry).collect(),
    })
}

fn to_live_entry(entry: &NetworkAclEntry) -> Option<LiveRuleEntry> {
    Some(LiveRuleEntry {
        number: entry.rule_number()?,
        direction: Direction::from_egress(entry.egress().unwrap_or(false)),
        protocol: entry.protocol().map(str::to_string),
        action: entry.rule_action().map(|a| a.as_str().to_string()),
        cidr_block: entry
            .cidr_block()
            .or(entry.ipv6_cidr_block())
            .map(str::to_string),
    })
}

fn to_port_range(entry: &RuleEntry) -> Option<PortRange> {
    entry
        .port_range
        .map(|range| PortRange::builder().from(range.from).to(range.to).build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use naclflow_cloud::{PortRange as RulePorts, Protocol};

    fn sdk_entry(number: i32, egress: bool) -> NetworkAclEntry {
        NetworkAclEntry::builder()
            .rule_number(number)
            .egress(egress)
            .protocol("6")
            .rule_action(RuleAction::Allow)
            .cidr_block("10.0.0.0/16")
            .build()
    }

    #[test]
    fn test_to_acl() {
        let sdk_acl = NetworkAcl::builder()
            .network_acl_id("acl-0abc")
            .vpc_id("vpc-0123")
            .tags(Tag::builder().key("Name").value("web").build())
            .tags(Tag::builder().key("env").value("prod").build())
            .entries(sdk_entry(100, false))
            .entries(sdk_entry(100, true))
            .build();

        let acl = to_acl(&sdk_acl).unwrap();

        assert_eq!(acl.id, "acl-0abc");
        assert_eq!(acl.vpc_id, "vpc-0123");
        assert_eq!(acl.name(), Some("web"));
        assert_eq!(acl.tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(acl.entries.len(), 2);
        assert_eq!(acl.entries[0].direction, Direction::Ingress);
        assert_eq!(acl.entries[1].direction, Direction::Egress);
        assert_eq!(acl.entries[0].protocol.as_deref(), Some("6"));
        assert_eq!(acl.entries[0].action.as_deref(), Some("allow"));
    }

    #[test]
    fn test_to_acl_without_id_is_skipped() {
        let sdk_acl = NetworkAcl::builder().vpc_id("vpc-0123").build();
        assert!(to_acl(&sdk_acl).is_none());
    }

    #[test]
    fn test_ipv6_entry_uses_ipv6_cidr() {
        let entry = NetworkAclEntry::builder()
            .rule_number(32767)
            .egress(false)
            .ipv6_cidr_block("::/0")
            .build();

        let live = to_live_entry(&entry).unwrap();
        assert_eq!(live.cidr_block.as_deref(), Some("::/0"));
    }

    #[test]
    fn test_port_range_conversion() {
        let mut entry = RuleEntry {
            number: 100,
            direction: Direction::Ingress,
            protocol: Protocol::Tcp,
            action: "allow".to_string(),
            cidr_block: "0.0.0.0/0".to_string(),
            port_range: Some(RulePorts { from: 80, to: 443 }),
        };

        let range = to_port_range(&entry).unwrap();
        assert_eq!(range.from(), Some(80));
        assert_eq!(range.to(), Some(443));

        entry.port_range = None;
        assert!(to_port_range(&entry).is_none());
    }

    #[tokio::test]
    async fn test_connect_with_explicit_region() {
        let options = ConnectOptions {
            region: Some("ap-northeast-1".to_string()),
            profile: None,
        };

        let provider = Ec2AclProvider::connect(&options).await.unwrap();
        assert_eq!(provider.region(), "ap-northeast-1");
        assert_eq!(provider.name(), "aws-ec2");
    }

    #[tokio::test]
    async fn test_connect_without_region_fails() {
        let result = temp_env::async_with_vars(
            [
                ("AWS_REGION", None),
                ("AWS_DEFAULT_REGION", None),
                ("AWS_PROFILE", None),
                ("AWS_CONFIG_FILE", Some("/nonexistent/naclflow/config")),
                ("AWS_EC2_METADATA_DISABLED", Some("true")),
            ],
            Ec2AclProvider::connect(&ConnectOptions::default()),
        )
        .await;

        assert!(matches!(result, Err(AwsError::MissingRegion)));
    }
}
