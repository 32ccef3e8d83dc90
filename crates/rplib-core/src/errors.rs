use thiserror::Error;

/// Errors raised by the serial assertion workflow.
///
/// Every variant is terminal for the current invocation.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Model assertion is unusable or an assertion field is empty.
    #[error(transparent)]
    Assert(#[from] rplib_assert::AssertError),
    /// Key storage, generation or export failed.
    #[error("key provisioning failed: {0}")]
    Keygen(#[from] crate::keygen::KeygenError),
    /// Hardware serial could not be read.
    #[error("serial collection failed: {0}")]
    Serial(#[from] crate::hardware::SerialError),
    /// Transport failure or rejection by the vault; rejections keep the
    /// server text verbatim.
    #[error(transparent)]
    Vault(#[from] crate::vault::VaultError),
    /// Writing an assertion file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
