//! Whether a settlement can be paid out
//!
//! Address grammar checking belongs to an external validator; this module
//! only defines the seam and interprets its answer.

use serde::{Deserialize, Serialize};

/// Format checker for payment addresses on the target network
pub trait AddressValidator: Send + Sync {
    /// Whether `address` is well formed
    fn is_valid(&self, address: &str) -> bool;
}

impl<F> AddressValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid(&self, address: &str) -> bool {
        self(address)
    }
}

/// Can the creditor of an instruction be paid?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Payability {
    /// Address present and accepted by the validator
    Payable { address: String },
    /// Address present, no validator was consulted
    Unverified { address: String },
    /// Address present and rejected by the validator
    InvalidAddress { address: String },
    /// Creditor has no payment address on file (or is not a known member)
    MissingAddress,
}

impl Payability {
    /// Assess a creditor's payment address
    pub fn assess(address: Option<&str>, validator: Option<&dyn AddressValidator>) -> Self {
        let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) else {
            return Self::MissingAddress;
        };
        let address = address.to_string();
        match validator {
            None => Self::Unverified { address },
            Some(v) if v.is_valid(&address) => Self::Payable { address },
            Some(_) => Self::InvalidAddress { address },
        }
    }

    /// Whether a payment may be offered to the debtor
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Payable { .. })
    }

    /// Address to show, if any
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Payable { address } | Self::Unverified { address } | Self::InvalidAddress { address } => {
                Some(address)
            }
            Self::MissingAddress => None,
        }
    }
}
