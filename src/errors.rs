//! Error types for interactive and non-interactive Sigma protocols.
//!
//! All verification-related failures (bad proof length, bad tag, malformed
//! encodings, failed verification equations) collapse into the single
//! [`Error::VerificationFailure`] kind, so a verifier rejects with a constant
//! error shape regardless of which stage failed.

/// Represents an error encountered during the execution of a Sigma protocol.
///
/// This may occur during proof generation, response computation, or verification.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proof is invalid: verification failed.
    #[error("Verification failed.")]
    VerificationFailure,
    /// Indicates an invalid statement/witness pair.
    #[error("Invalid instance/witness pair.")]
    InvalidInstanceWitnessPair,
    /// Uninitialized group element variable.
    #[error("Uninitialized group element variable: {var_debug}")]
    UnassignedGroupVar {
        /// Debug representation of the unassigned variable.
        var_debug: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
