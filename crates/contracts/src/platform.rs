//! OrientationPlatform trait - device sensor collaborator
//!
//! Decouples the sampling loop from the concrete sensor. Real devices, the
//! simulated sweep, and scripted test platforms all implement this trait.

use crate::OrientationSample;

/// Result of asking the platform for orientation access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Granted,
    Denied,
    /// The platform has no orientation capability at all
    Unsupported,
}

/// Device orientation platform
///
/// # Example
///
/// ```ignore
/// let platform: Box<dyn OrientationPlatform> = get_platform();
/// if platform.is_supported() && platform.request_permission() == AccessOutcome::Granted {
///     if let Some(sample) = platform.try_read() {
///         println!("beta = {:?}", sample.beta);
///     }
/// }
/// ```
pub trait OrientationPlatform: Send + Sync {
    /// Platform name (used for logging)
    fn name(&self) -> &str;

    /// Whether the device exposes orientation at all
    fn is_supported(&self) -> bool;

    /// Whether reading requires an explicit consent prompt
    fn requires_permission(&self) -> bool;

    /// Prompt the user for consent
    ///
    /// Called at most once per session, and only when
    /// [`requires_permission`](Self::requires_permission) is true.
    fn request_permission(&self) -> AccessOutcome;

    /// Take one fresh reading without blocking
    ///
    /// Returns `None` when no reading is available right now.
    fn try_read(&self) -> Option<OrientationSample>;
}
