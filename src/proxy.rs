//! The LiveDisplay service proxy.

use crate::error::ClientError;
use crate::hal::{ColorHal, DeathRecipient, SERVICE_NAME, ServiceRegistry};
use crate::types::{DisplayMode, Feature, Hsic, Range};
use crate::vendor::VendorRegistry;
use crate::wire::{Mode, WireHsic};

use log::{debug, info, warn};
use std::sync::{Arc, Mutex, Weak};

/// Supported-features cache. `Known(0)` is a real answer ("queried, nothing
/// supported") and is kept until the handle is invalidated; it must not be
/// confused with `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeatureCache {
    Unknown,
    Known(u32),
}

/// Connection state guarded by one mutex. The feature cache lives and dies
/// with the handle.
struct Connection {
    hal: Option<Arc<dyn ColorHal>>,
    features: FeatureCache,
}

impl Connection {
    fn clear(&mut self) {
        self.hal = None;
        self.features = FeatureCache::Unknown;
    }
}

// =============================================================================
// LiveDisplayProxy
// =============================================================================

/// Client-side proxy for the vendor color service.
///
/// The proxy connects lazily on first use and caches the service handle.
/// A transport failure or a service-death notification drops the cached
/// handle, and the next call reconnects. Calls never panic and never retry:
/// a failed call returns its neutral value (`false`, `0`, `Err`) and the
/// caller retries at its own cadence.
///
/// # Example
///
/// ```no_run
/// use livedisplay_client::{Feature, LiveDisplayProxy};
///
/// let proxy = LiveDisplayProxy::system();
/// if proxy.has_feature(Feature::DisplayModes) {
///     for mode in proxy.display_modes().unwrap_or_default() {
///         println!("{} (id {})", mode.name, mode.id);
///     }
/// }
/// ```
pub struct LiveDisplayProxy {
    registry: Box<dyn ServiceRegistry>,
    conn: Arc<Mutex<Connection>>,
}

impl LiveDisplayProxy {
    /// Create a proxy backed by the given service registry.
    pub fn new(registry: Box<dyn ServiceRegistry>) -> Self {
        Self {
            registry,
            conn: Arc::new(Mutex::new(Connection {
                hal: None,
                features: FeatureCache::Unknown,
            })),
        }
    }

    /// Create a proxy backed by the vendor client library on this device.
    pub fn system() -> Self {
        Self::new(Box::new(VendorRegistry::new()))
    }

    /// Return the cached handle, connecting if necessary.
    ///
    /// The lookup runs under the connection mutex: one thread connects at a
    /// time, and a death notification arriving mid-connect serializes behind
    /// the install instead of observing a half-initialized handle.
    fn acquire(&self) -> Result<Arc<dyn ColorHal>, ClientError> {
        let mut conn = self.conn.lock().unwrap();
        if let Some(hal) = &conn.hal {
            return Ok(Arc::clone(hal));
        }

        let hal = match self.registry.get_service(SERVICE_NAME) {
            Ok(hal) => hal,
            Err(ClientError::ServiceNotFound) => {
                debug!("vendor color service not present");
                return Err(ClientError::ServiceNotFound);
            }
            Err(e) => {
                warn!("vendor color service lookup failed: {e}");
                return Err(e);
            }
        };

        // Weak: a recipient held by the vendor library must not keep a
        // dropped proxy's state alive.
        let state = Arc::downgrade(&self.conn);
        hal.link_to_death(death_recipient(state))?;

        conn.hal = Some(Arc::clone(&hal));
        info!("connected to {SERVICE_NAME}");
        Ok(hal)
    }

    fn invalidate(&self) {
        self.conn.lock().unwrap().clear();
    }

    /// Run one remote call against the cached handle. On transport failure,
    /// log, drop the handle, and hand the error back as a value.
    fn call<T>(
        &self,
        op: impl FnOnce(&dyn ColorHal) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let hal = self.acquire()?;
        match op(hal.as_ref()) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("remote call failed: {e}");
                self.invalidate();
                Err(e)
            }
        }
    }

    // =========================================================================
    // Features
    // =========================================================================

    /// Whether the vendor service implements `feature`.
    ///
    /// The supported-features mask is queried once per connection and cached
    /// (a mask of zero included); invalidating the handle resets the cache.
    /// Returns `false` while the service is unreachable.
    pub fn has_feature(&self, feature: Feature) -> bool {
        let hal = match self.acquire() {
            Ok(hal) => hal,
            Err(_) => return false,
        };

        if let FeatureCache::Known(mask) = self.conn.lock().unwrap().features {
            return mask & feature.bit() != 0;
        }

        match hal.get_supported_features() {
            Ok(mask) => {
                if mask != 0 {
                    info!("vendor color service features: {mask:#x}");
                }
                let mut conn = self.conn.lock().unwrap();
                // A death notification may have raced the query; only cache
                // against a live handle.
                if conn.hal.is_some() {
                    conn.features = FeatureCache::Known(mask);
                }
                mask & feature.bit() != 0
            }
            Err(e) => {
                warn!("feature query failed: {e}");
                self.invalidate();
                false
            }
        }
    }

    // =========================================================================
    // Display modes
    // =========================================================================

    /// All display modes the panel supports.
    pub fn display_modes(&self) -> Result<Vec<DisplayMode>, ClientError> {
        self.call(|hal| hal.get_display_modes())
            .map(|modes| modes.into_iter().filter_map(Mode::into_display_mode).collect())
    }

    /// The active display mode, or `Ok(None)` when the vendor reports no
    /// mode set.
    pub fn current_mode(&self) -> Result<Option<DisplayMode>, ClientError> {
        self.call(|hal| hal.get_current_display_mode())
            .map(Mode::into_display_mode)
    }

    /// The boot-time default display mode, or `Ok(None)` when no default is
    /// configured.
    pub fn default_mode(&self) -> Result<Option<DisplayMode>, ClientError> {
        self.call(|hal| hal.get_default_display_mode())
            .map(Mode::into_display_mode)
    }

    /// Switch to `mode`, optionally making it the boot-time default.
    /// Returns whether the switch took effect.
    pub fn set_mode(&self, mode: &DisplayMode, make_default: bool) -> bool {
        match self.call(|hal| hal.set_display_mode(mode.id, make_default)) {
            Ok(accepted) => {
                if accepted {
                    info!("display mode set to '{}' (id {})", mode.name, mode.id);
                }
                accepted
            }
            Err(_) => false,
        }
    }

    // =========================================================================
    // Adaptive backlight / outdoor mode
    // =========================================================================

    /// Whether content-adaptive backlight is on. `false` when unreachable.
    pub fn adaptive_backlight_enabled(&self) -> bool {
        self.call(|hal| hal.get_adaptive_backlight_enabled())
            .unwrap_or(false)
    }

    /// Turn content-adaptive backlight on or off.
    pub fn set_adaptive_backlight_enabled(&self, enabled: bool) -> bool {
        self.call(|hal| hal.set_adaptive_backlight_enabled(enabled))
            .unwrap_or(false)
    }

    /// Whether outdoor mode is on. `false` when unreachable.
    pub fn outdoor_mode_enabled(&self) -> bool {
        self.call(|hal| hal.get_outdoor_mode_enabled())
            .unwrap_or(false)
    }

    /// Turn outdoor mode on or off.
    pub fn set_outdoor_mode_enabled(&self, enabled: bool) -> bool {
        self.call(|hal| hal.set_outdoor_mode_enabled(enabled))
            .unwrap_or(false)
    }

    // =========================================================================
    // Color balance
    // =========================================================================

    /// Current color balance value. `0` when unreachable.
    pub fn color_balance(&self) -> i32 {
        self.call(|hal| hal.get_color_balance()).unwrap_or(0)
    }

    /// Set the color balance value.
    pub fn set_color_balance(&self, value: i32) -> bool {
        self.call(|hal| hal.set_color_balance(value))
            .unwrap_or(false)
    }

    /// Accepted color balance values.
    pub fn color_balance_range(&self) -> Result<Range<i32>, ClientError> {
        self.call(|hal| hal.get_color_balance_range())
            .map(Into::into)
    }

    // =========================================================================
    // Picture adjustment
    // =========================================================================

    /// Current picture adjustment.
    pub fn picture_adjustment(&self) -> Result<Hsic, ClientError> {
        self.call(|hal| hal.get_picture_adjustment()).map(Into::into)
    }

    /// Factory-default picture adjustment.
    pub fn default_picture_adjustment(&self) -> Result<Hsic, ClientError> {
        self.call(|hal| hal.get_default_picture_adjustment())
            .map(Into::into)
    }

    /// Apply a picture adjustment.
    pub fn set_picture_adjustment(&self, hsic: &Hsic) -> bool {
        self.call(|hal| hal.set_picture_adjustment(WireHsic::from(hsic)))
            .unwrap_or(false)
    }

    /// Accepted hue values.
    pub fn hue_range(&self) -> Result<Range<f32>, ClientError> {
        self.call(|hal| hal.get_hue_range()).map(Into::into)
    }

    /// Accepted saturation values.
    pub fn saturation_range(&self) -> Result<Range<f32>, ClientError> {
        self.call(|hal| hal.get_saturation_range()).map(Into::into)
    }

    /// Accepted intensity values.
    pub fn intensity_range(&self) -> Result<Range<f32>, ClientError> {
        self.call(|hal| hal.get_intensity_range()).map(Into::into)
    }

    /// Accepted contrast values.
    pub fn contrast_range(&self) -> Result<Range<f32>, ClientError> {
        self.call(|hal| hal.get_contrast_range()).map(Into::into)
    }

    /// Accepted saturation threshold values.
    pub fn saturation_threshold_range(&self) -> Result<Range<f32>, ClientError> {
        self.call(|hal| hal.get_saturation_threshold_range())
            .map(Into::into)
    }
}

fn death_recipient(state: Weak<Mutex<Connection>>) -> DeathRecipient {
    Arc::new(move || {
        if let Some(conn) = state.upgrade() {
            warn!("vendor color service died, dropping cached handle");
            conn.lock().unwrap().clear();
        }
    })
}
