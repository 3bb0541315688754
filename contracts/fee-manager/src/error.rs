//! Error types for the fee manager contract

use common::FeeError;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FeeManagerError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Fee(#[from] FeeError),

    #[error("Unauthorized: missing role {role}")]
    Unauthorized { role: String },
}
