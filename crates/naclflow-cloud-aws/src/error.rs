//! AWS provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("No AWS region configured. Set --region, AWS_REGION or a profile region")]
    MissingRegion,
}

pub type Result<T> = std::result::Result<T, AwsError>;
