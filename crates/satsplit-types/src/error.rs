//! Error types for SatSplit
//!
//! The netting engine itself is total. These errors belong to the caller-side
//! surface: amount arithmetic, input parsing and settlement record lifecycle.

use thiserror::Error;

/// Result type for SatSplit operations
pub type Result<T> = std::result::Result<T, SatsplitError>;

/// SatSplit error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SatsplitError {
    // ========================================================================
    // Amount Errors
    // ========================================================================

    /// Amount overflow during arithmetic
    #[error("Amount overflow during arithmetic operation")]
    AmountOverflow,

    /// Amount underflow during arithmetic
    #[error("Amount underflow during arithmetic operation")]
    AmountUnderflow,

    // ========================================================================
    // Ledger Errors
    // ========================================================================

    /// Balances do not sum to zero
    #[error("Conservation violation: net sum is {net_sum} sats")]
    ConservationViolation { net_sum: i64 },

    /// Referenced user is not a known group member
    #[error("Unknown member {user_id}")]
    UnknownMember { user_id: String },

    // ========================================================================
    // Settlement Errors
    // ========================================================================

    /// Settlement already carries a transaction reference
    #[error("Settlement {settlement_id} is already completed")]
    SettlementAlreadyCompleted { settlement_id: String },

    /// Unauthorized action
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // ========================================================================
    // General Errors
    // ========================================================================

    /// Invalid input
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },
}

impl SatsplitError {
    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::AmountUnderflow => "AMOUNT_UNDERFLOW",
            Self::ConservationViolation { .. } => "CONSERVATION_VIOLATION",
            Self::UnknownMember { .. } => "UNKNOWN_MEMBER",
            Self::SettlementAlreadyCompleted { .. } => "SETTLEMENT_ALREADY_COMPLETED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}
