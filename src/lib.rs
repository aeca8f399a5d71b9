//! Client library for the LineageOS LiveDisplay vendor color service.
//!
//! This crate forwards display-personalization calls (display modes, color
//! balance, picture adjustment, adaptive backlight, outdoor mode) to the
//! vendor color service through its client library. The proxy connects
//! lazily, caches the service handle, and drops it on transport failure or
//! when the service process dies; the next call reconnects.
//!
//! # Example
//!
//! ```no_run
//! use livedisplay_client::{Feature, LiveDisplayProxy};
//!
//! let proxy = LiveDisplayProxy::system();
//!
//! if proxy.has_feature(Feature::DisplayModes) {
//!     for mode in proxy.display_modes().unwrap_or_default() {
//!         println!("{} (id {})", mode.name, mode.id);
//!     }
//!     if let Ok(Some(current)) = proxy.current_mode() {
//!         println!("current: {}", current.name);
//!     }
//! }
//!
//! if proxy.has_feature(Feature::ColorBalance) {
//!     proxy.set_color_balance(25);
//! }
//! ```
//!
//! A call made while the service is unreachable returns its neutral value
//! (`false`, `0`, `Err`) and never panics; callers retry at their own
//! cadence, typically the next settings read.
//!
//! # Testing
//!
//! Use [`MockRegistry`] to test code without a vendor library:
//!
//! ```
//! use livedisplay_client::{Feature, LiveDisplayProxy, MockRegistry};
//!
//! let registry = MockRegistry::new();
//! registry.hal().set_features(Feature::OutdoorMode.bit());
//!
//! let proxy = LiveDisplayProxy::new(Box::new(registry.clone()));
//! assert!(proxy.has_feature(Feature::OutdoorMode));
//! assert!(!proxy.has_feature(Feature::ColorBalance));
//! ```

#![warn(missing_docs)]

mod error;
mod hal;
mod mock;
mod proxy;
mod types;
mod vendor;
pub mod wire;

// Re-export public API
pub use error::ClientError;
pub use hal::{ColorHal, DeathRecipient, SERVICE_NAME, ServiceRegistry};
pub use mock::{MockColorHal, MockRegistry, MockState};
pub use proxy::LiveDisplayProxy;
pub use types::{DisplayMode, Feature, Hsic, Range};
pub use vendor::{VendorColorHal, VendorRegistry};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{Mode, NO_MODE};

    fn proxy_with(registry: &MockRegistry) -> LiveDisplayProxy {
        LiveDisplayProxy::new(Box::new(registry.clone()))
    }

    fn srgb_and_vivid() -> Vec<Mode> {
        vec![
            Mode {
                id: 0,
                name: "sRGB".into(),
            },
            Mode {
                id: 1,
                name: "Vivid".into(),
            },
        ]
    }

    #[test]
    fn test_absent_service_returns_neutral_defaults() {
        let registry = MockRegistry::new();
        registry.set_absent(true);
        let proxy = proxy_with(&registry);

        assert!(!proxy.has_feature(Feature::DisplayModes));
        assert!(proxy.display_modes().is_err());
        assert!(proxy.current_mode().is_err());
        assert!(proxy.default_mode().is_err());
        assert!(!proxy.set_mode(&DisplayMode::new(0, "sRGB"), false));
        assert!(!proxy.adaptive_backlight_enabled());
        assert!(!proxy.set_adaptive_backlight_enabled(true));
        assert!(!proxy.outdoor_mode_enabled());
        assert!(!proxy.set_outdoor_mode_enabled(true));
        assert_eq!(proxy.color_balance(), 0);
        assert!(!proxy.set_color_balance(10));
        assert!(proxy.color_balance_range().is_err());
        assert!(proxy.picture_adjustment().is_err());
        assert!(proxy.default_picture_adjustment().is_err());
        assert!(!proxy.set_picture_adjustment(&Hsic::new(0.0, 1.0, 1.0, 1.0)));
        assert!(proxy.hue_range().is_err());
        assert!(proxy.saturation_threshold_range().is_err());
    }

    #[test]
    fn test_handle_acquisition_is_idempotent() {
        let registry = MockRegistry::new();
        registry.hal().set_modes(srgb_and_vivid());
        let proxy = proxy_with(&registry);

        assert_eq!(proxy.display_modes().unwrap().len(), 2);
        let _ = proxy.color_balance();
        let _ = proxy.adaptive_backlight_enabled();
        let _ = proxy.current_mode();

        assert_eq!(registry.lookups(), 1);
    }

    #[test]
    fn test_death_notification_triggers_single_relookup() {
        let registry = MockRegistry::new();
        registry.hal().set_modes(srgb_and_vivid());
        let proxy = proxy_with(&registry);

        assert!(proxy.display_modes().is_ok());
        assert_eq!(registry.lookups(), 1);

        registry.hal().kill();
        registry.hal().revive();

        assert_eq!(proxy.display_modes().unwrap().len(), 2);
        assert_eq!(registry.lookups(), 2);

        // Handle is cached again after the reconnect.
        assert!(proxy.current_mode().is_ok());
        assert_eq!(registry.lookups(), 2);
    }

    #[test]
    fn test_transport_fault_invalidates_handle() {
        let registry = MockRegistry::new();
        let proxy = proxy_with(&registry);

        registry.hal().set_modes(srgb_and_vivid());
        assert!(proxy.set_mode(&DisplayMode::new(1, "Vivid"), false));
        assert_eq!(registry.lookups(), 1);

        registry.hal().disconnect();
        assert_eq!(proxy.color_balance(), 0);
        // The failed call used the cached handle; no extra lookup yet.
        assert_eq!(registry.lookups(), 1);

        registry.hal().revive();
        assert!(proxy.current_mode().is_ok());
        assert_eq!(registry.lookups(), 2);
    }

    #[test]
    fn test_sentinel_mode_becomes_absent() {
        let registry = MockRegistry::new();
        registry.hal().set_modes(srgb_and_vivid());
        registry.hal().set_current_mode_id(NO_MODE);
        registry.hal().set_default_mode_id(NO_MODE);
        let proxy = proxy_with(&registry);

        assert_eq!(proxy.current_mode().unwrap(), None);
        assert_eq!(proxy.default_mode().unwrap(), None);

        registry.hal().set_current_mode_id(1);
        let current = proxy.current_mode().unwrap().unwrap();
        assert_eq!(current.id, 1);
        assert_eq!(current.name, "Vivid");
    }

    #[test]
    fn test_feature_mask_is_cached_per_connection() {
        let registry = MockRegistry::new();
        registry
            .hal()
            .set_features(Feature::DisplayModes.bit() | Feature::ColorBalance.bit());
        let proxy = proxy_with(&registry);

        assert!(proxy.has_feature(Feature::DisplayModes));
        assert!(proxy.has_feature(Feature::ColorBalance));
        assert!(!proxy.has_feature(Feature::OutdoorMode));
        assert_eq!(registry.hal().feature_queries(), 1);

        // A changed mask is not observed while the handle stays valid.
        registry.hal().set_features(0x1f);
        assert!(!proxy.has_feature(Feature::OutdoorMode));
        assert_eq!(registry.hal().feature_queries(), 1);
    }

    #[test]
    fn test_zero_feature_mask_is_a_cached_answer() {
        let registry = MockRegistry::new();
        let proxy = proxy_with(&registry);

        assert!(!proxy.has_feature(Feature::PictureAdjustment));
        assert!(!proxy.has_feature(Feature::AdaptiveBacklight));
        assert_eq!(registry.hal().feature_queries(), 1);
    }

    #[test]
    fn test_feature_cache_resets_on_death() {
        let registry = MockRegistry::new();
        registry.hal().set_features(Feature::DisplayModes.bit());
        let proxy = proxy_with(&registry);

        assert!(proxy.has_feature(Feature::DisplayModes));
        assert_eq!(registry.hal().feature_queries(), 1);

        registry.hal().kill();
        registry.hal().revive();
        registry.hal().set_features(0);

        assert!(!proxy.has_feature(Feature::DisplayModes));
        assert_eq!(registry.hal().feature_queries(), 2);
    }

    #[test]
    fn test_set_mode_updates_current_and_default() {
        let registry = MockRegistry::new();
        registry.hal().set_modes(srgb_and_vivid());
        let proxy = proxy_with(&registry);

        assert!(proxy.set_mode(&DisplayMode::new(0, "sRGB"), true));
        assert_eq!(proxy.current_mode().unwrap().unwrap().id, 0);
        assert_eq!(proxy.default_mode().unwrap().unwrap().id, 0);

        // A mode the panel does not advertise is rejected, not an error.
        assert!(!proxy.set_mode(&DisplayMode::new(9, "Bogus"), false));
        assert_eq!(proxy.current_mode().unwrap().unwrap().id, 0);
    }

    #[test]
    fn test_color_balance_and_ranges() {
        let registry = MockRegistry::new();
        let proxy = proxy_with(&registry);

        assert_eq!(proxy.color_balance_range().unwrap(), Range::new(-100, 100));
        assert!(proxy.set_color_balance(25));
        assert_eq!(proxy.color_balance(), 25);
        assert!(!proxy.set_color_balance(500));
        assert_eq!(proxy.color_balance(), 25);

        // Hue travels as an integer range, surfaces as floats.
        assert_eq!(proxy.hue_range().unwrap(), Range::new(0.0, 360.0));
        assert_eq!(proxy.saturation_range().unwrap(), Range::new(0.0, 2.0));
    }

    #[test]
    fn test_picture_adjustment_round_trip() {
        let registry = MockRegistry::new();
        let proxy = proxy_with(&registry);

        let hsic = Hsic {
            hue: 180.0,
            saturation: 1.2,
            intensity: 1.0,
            contrast: 0.9,
            saturation_threshold: 0.1,
        };
        assert!(proxy.set_picture_adjustment(&hsic));
        assert_eq!(proxy.picture_adjustment().unwrap(), hsic);
        assert_eq!(proxy.default_picture_adjustment().unwrap(), Hsic::default());
    }

    #[test]
    fn test_death_after_proxy_drop_is_harmless() {
        let registry = MockRegistry::new();
        let proxy = proxy_with(&registry);
        let _ = proxy.color_balance();
        drop(proxy);

        // The recipient holds only a weak reference to the proxy state.
        registry.hal().kill();
    }
}
