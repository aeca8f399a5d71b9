//! Error types for the LiveDisplay client.

/// Errors that can occur while talking to the vendor color service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The vendor service is not present on this device.
    #[error("Vendor color service not found")]
    ServiceNotFound,

    /// Failed to load the vendor client library.
    #[error("Failed to load vendor library: {0}")]
    LibraryLoad(#[from] libloading::Error),

    /// Vendor client initialization failed.
    #[error("Vendor client initialization failed (status: {0})")]
    InitFailed(i64),

    /// A remote call failed at the transport level.
    #[error("Remote call {call} failed (status: {status})")]
    Transport {
        /// The remote call that failed.
        call: &'static str,
        /// Status code returned by the transport.
        status: i64,
    },
}
