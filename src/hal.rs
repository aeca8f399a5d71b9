//! The remote vendor interface and service lookup seam.

use crate::error::ClientError;
use crate::wire::{FloatRange, IntRange, Mode, WireHsic};

use std::sync::Arc;

/// Well-known name of the vendor color service.
pub const SERVICE_NAME: &str = "vendor.lineage.livedisplay.color";

/// Callback invoked when the vendor service process dies.
pub type DeathRecipient = Arc<dyn Fn() + Send + Sync>;

/// The remote surface of the vendor color service.
///
/// Every method is one remote call. Implementations return
/// [`ClientError::Transport`] on transport failure and never block beyond
/// the latency of the call itself. This is a trait so tests can substitute
/// [`MockColorHal`](crate::MockColorHal) for the real vendor transport.
pub trait ColorHal: Send + Sync {
    /// Bitmask of [`Feature`](crate::Feature) values the service implements.
    fn get_supported_features(&self) -> Result<u32, ClientError>;

    /// All display modes the panel supports.
    fn get_display_modes(&self) -> Result<Vec<Mode>, ClientError>;

    /// The active display mode. Id [`NO_MODE`](crate::wire::NO_MODE) when
    /// no mode is set.
    fn get_current_display_mode(&self) -> Result<Mode, ClientError>;

    /// The boot-time default display mode. Id [`NO_MODE`](crate::wire::NO_MODE)
    /// when no default is configured.
    fn get_default_display_mode(&self) -> Result<Mode, ClientError>;

    /// Switch to the mode with the given id, optionally making it the
    /// boot-time default. Returns whether the vendor accepted the switch.
    fn set_display_mode(&self, id: i32, make_default: bool) -> Result<bool, ClientError>;

    /// Whether content-adaptive backlight is currently on.
    fn get_adaptive_backlight_enabled(&self) -> Result<bool, ClientError>;

    /// Turn content-adaptive backlight on or off.
    fn set_adaptive_backlight_enabled(&self, enabled: bool) -> Result<bool, ClientError>;

    /// Whether outdoor (sunlight) mode is currently on.
    fn get_outdoor_mode_enabled(&self) -> Result<bool, ClientError>;

    /// Turn outdoor mode on or off.
    fn set_outdoor_mode_enabled(&self, enabled: bool) -> Result<bool, ClientError>;

    /// Current color balance value.
    fn get_color_balance(&self) -> Result<i32, ClientError>;

    /// Set the color balance value.
    fn set_color_balance(&self, value: i32) -> Result<bool, ClientError>;

    /// Accepted color balance values.
    fn get_color_balance_range(&self) -> Result<IntRange, ClientError>;

    /// Current picture adjustment.
    fn get_picture_adjustment(&self) -> Result<WireHsic, ClientError>;

    /// Factory-default picture adjustment.
    fn get_default_picture_adjustment(&self) -> Result<WireHsic, ClientError>;

    /// Apply a picture adjustment.
    fn set_picture_adjustment(&self, hsic: WireHsic) -> Result<bool, ClientError>;

    /// Accepted hue values.
    fn get_hue_range(&self) -> Result<IntRange, ClientError>;

    /// Accepted saturation values.
    fn get_saturation_range(&self) -> Result<FloatRange, ClientError>;

    /// Accepted intensity values.
    fn get_intensity_range(&self) -> Result<FloatRange, ClientError>;

    /// Accepted contrast values.
    fn get_contrast_range(&self) -> Result<FloatRange, ClientError>;

    /// Accepted saturation threshold values.
    fn get_saturation_threshold_range(&self) -> Result<FloatRange, ClientError>;

    /// Register a callback to run when the service process dies. The
    /// callback may fire on an arbitrary thread.
    fn link_to_death(&self, recipient: DeathRecipient) -> Result<(), ClientError>;
}

/// Locates a [`ColorHal`] by its well-known service name.
///
/// The proxy never constructs a transport directly; it asks a registry so
/// tests can count lookups and inject failures.
pub trait ServiceRegistry: Send + Sync {
    /// Look up the service. [`ClientError::ServiceNotFound`] when the
    /// service is not present on this device.
    fn get_service(&self, name: &str) -> Result<Arc<dyn ColorHal>, ClientError>;
}
