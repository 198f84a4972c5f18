//! AWS EC2 provider for naclflow
//!
//! This crate implements the AclProvider trait on top of `aws-sdk-ec2`,
//! enabling naclflow to manage VPC network ACLs.
//!
//! # Requirements
//!
//! - Credentials are resolved through the standard AWS chain
//!   (environment, shared config/credentials files, SSO, IMDS)
//! - A region must be resolvable, either explicitly or from that chain
//!
//! # Example
//!
//! ```ignore
//! use naclflow_cloud::Reconciler;
//! use naclflow_cloud_aws::{ConnectOptions, Ec2AclProvider};
//!
//! let provider = Ec2AclProvider::connect(&ConnectOptions::default()).await?;
//! let outcome = Reconciler::new(&provider, desired).ensure_present().await?;
//! ```

pub mod error;
pub mod provider;

pub use error::{AwsError, Result};
pub use provider::{ConnectOptions, Ec2AclProvider};
