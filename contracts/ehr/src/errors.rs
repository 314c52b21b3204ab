use soroban_sdk::contracterror;

/// Contract error taxonomy.
///
/// The `u32` codes are part of the wire contract (callers match on
/// `Error(Contract, #N)`) and must never be renumbered.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum EhrError {
    AlreadyInitialized = 1,
    InvalidInput = 2,
    NotFound = 3,
    AccessDenied = 4,
}

impl EhrError {
    /// Whether retrying the same call can succeed without the caller
    /// changing something first. Nothing in this taxonomy is transient:
    /// `InvalidInput` needs a fixed payload, `NotFound` a different ID,
    /// `AccessDenied` a privilege change.
    pub fn retryable(&self) -> bool {
        false
    }

    pub fn message(&self) -> &'static str {
        match self {
            EhrError::AlreadyInitialized => "Ledger is already initialized",
            EhrError::InvalidInput => "Invalid access control list format",
            EhrError::NotFound => "Record not found",
            EhrError::AccessDenied => "Access denied",
        }
    }
}
