//! Network ACL reconciliation error types

use thiserror::Error;

/// Errors raised while reconciling a network ACL
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Found more than one network ACL named '{name}' in VPC {vpc_id}")]
    DuplicateAcl { name: String, vpc_id: String },

    #[error("Invalid protocol: {0} (expected one of ICMP, TCP, UDP, ALL)")]
    InvalidProtocol(String),

    #[error("Rule number {0} is reserved for the provider's default deny rule")]
    ReservedRuleNumber(i32),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
