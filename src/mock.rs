//! Mock vendor service for testing.

use crate::error::ClientError;
use crate::hal::{ColorHal, DeathRecipient, ServiceRegistry};
use crate::wire::{FloatRange, IntRange, Mode, NO_MODE, WireHsic};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scriptable state backing a [`MockColorHal`].
#[derive(Debug, Clone)]
pub struct MockState {
    /// Supported-features bitmask.
    pub features: u32,
    /// Modes the mock panel advertises.
    pub modes: Vec<Mode>,
    /// Active mode id; [`NO_MODE`] for none.
    pub current_mode_id: i32,
    /// Default mode id; [`NO_MODE`] for none.
    pub default_mode_id: i32,
    /// Adaptive backlight switch.
    pub adaptive_backlight: bool,
    /// Outdoor mode switch.
    pub outdoor_mode: bool,
    /// Color balance value.
    pub color_balance: i32,
    /// Accepted color balance values.
    pub color_balance_range: IntRange,
    /// Current picture adjustment.
    pub picture_adjustment: WireHsic,
    /// Factory-default picture adjustment.
    pub default_picture_adjustment: WireHsic,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            features: 0,
            modes: Vec::new(),
            current_mode_id: NO_MODE,
            default_mode_id: NO_MODE,
            adaptive_backlight: false,
            outdoor_mode: false,
            color_balance: 0,
            color_balance_range: IntRange { min: -100, max: 100 },
            picture_adjustment: WireHsic::default(),
            default_picture_adjustment: WireHsic::default(),
        }
    }
}

// =============================================================================
// MockColorHal
// =============================================================================

/// An in-memory [`ColorHal`] for testing code against the proxy without a
/// vendor library.
///
/// The mock can be killed ([`MockColorHal::kill`]) to fire the registered
/// death recipients and make every subsequent call fail at the transport
/// level, and revived to let a reconnect succeed. It also counts
/// supported-features queries so tests can assert the proxy's cache.
pub struct MockColorHal {
    state: Mutex<MockState>,
    alive: AtomicBool,
    feature_queries: AtomicUsize,
    recipients: Mutex<Vec<DeathRecipient>>,
}

impl MockColorHal {
    /// Create a mock with default state (no features, no modes).
    pub fn new() -> Self {
        Self::with_state(MockState::default())
    }

    /// Create a mock with custom initial state.
    pub fn with_state(state: MockState) -> Self {
        Self {
            state: Mutex::new(state),
            alive: AtomicBool::new(true),
            feature_queries: AtomicUsize::new(0),
            recipients: Mutex::new(Vec::new()),
        }
    }

    /// Replace the supported-features bitmask.
    pub fn set_features(&self, features: u32) {
        self.state.lock().unwrap().features = features;
    }

    /// Replace the advertised mode list.
    pub fn set_modes(&self, modes: Vec<Mode>) {
        self.state.lock().unwrap().modes = modes;
    }

    /// Set the active mode id ([`NO_MODE`] for none).
    pub fn set_current_mode_id(&self, id: i32) {
        self.state.lock().unwrap().current_mode_id = id;
    }

    /// Set the default mode id ([`NO_MODE`] for none).
    pub fn set_default_mode_id(&self, id: i32) {
        self.state.lock().unwrap().default_mode_id = id;
    }

    /// Snapshot of the mock state.
    pub fn state(&self) -> MockState {
        self.state.lock().unwrap().clone()
    }

    /// How many times `get_supported_features` has been called.
    pub fn feature_queries(&self) -> usize {
        self.feature_queries.load(Ordering::SeqCst)
    }

    /// Simulate the service process dying: every later call fails at the
    /// transport level and all registered death recipients fire.
    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
        let recipients = self.recipients.lock().unwrap().clone();
        for recipient in recipients {
            recipient();
        }
    }

    /// Simulate a transport fault without a death notification: calls fail
    /// but no recipient fires. Pair with [`MockColorHal::revive`].
    pub fn disconnect(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Bring a killed service back so a reconnect can succeed.
    pub fn revive(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }

    fn guard(&self, call: &'static str) -> Result<(), ClientError> {
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClientError::Transport { call, status: -1 })
        }
    }

    fn mode_by_id(state: &MockState, id: i32) -> Mode {
        state
            .modes
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .unwrap_or(Mode {
                id,
                name: String::new(),
            })
    }
}

impl Default for MockColorHal {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorHal for MockColorHal {
    fn get_supported_features(&self) -> Result<u32, ClientError> {
        self.guard("get_supported_features")?;
        self.feature_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().features)
    }

    fn get_display_modes(&self) -> Result<Vec<Mode>, ClientError> {
        self.guard("get_display_modes")?;
        Ok(self.state.lock().unwrap().modes.clone())
    }

    fn get_current_display_mode(&self) -> Result<Mode, ClientError> {
        self.guard("get_current_display_mode")?;
        let state = self.state.lock().unwrap();
        Ok(Self::mode_by_id(&state, state.current_mode_id))
    }

    fn get_default_display_mode(&self) -> Result<Mode, ClientError> {
        self.guard("get_default_display_mode")?;
        let state = self.state.lock().unwrap();
        Ok(Self::mode_by_id(&state, state.default_mode_id))
    }

    fn set_display_mode(&self, id: i32, make_default: bool) -> Result<bool, ClientError> {
        self.guard("set_display_mode")?;
        let mut state = self.state.lock().unwrap();
        if !state.modes.iter().any(|m| m.id == id) {
            return Ok(false);
        }
        state.current_mode_id = id;
        if make_default {
            state.default_mode_id = id;
        }
        Ok(true)
    }

    fn get_adaptive_backlight_enabled(&self) -> Result<bool, ClientError> {
        self.guard("get_adaptive_backlight_enabled")?;
        Ok(self.state.lock().unwrap().adaptive_backlight)
    }

    fn set_adaptive_backlight_enabled(&self, enabled: bool) -> Result<bool, ClientError> {
        self.guard("set_adaptive_backlight_enabled")?;
        self.state.lock().unwrap().adaptive_backlight = enabled;
        Ok(true)
    }

    fn get_outdoor_mode_enabled(&self) -> Result<bool, ClientError> {
        self.guard("get_outdoor_mode_enabled")?;
        Ok(self.state.lock().unwrap().outdoor_mode)
    }

    fn set_outdoor_mode_enabled(&self, enabled: bool) -> Result<bool, ClientError> {
        self.guard("set_outdoor_mode_enabled")?;
        self.state.lock().unwrap().outdoor_mode = enabled;
        Ok(true)
    }

    fn get_color_balance(&self) -> Result<i32, ClientError> {
        self.guard("get_color_balance")?;
        Ok(self.state.lock().unwrap().color_balance)
    }

    fn set_color_balance(&self, value: i32) -> Result<bool, ClientError> {
        self.guard("set_color_balance")?;
        let mut state = self.state.lock().unwrap();
        if value < state.color_balance_range.min || value > state.color_balance_range.max {
            return Ok(false);
        }
        state.color_balance = value;
        Ok(true)
    }

    fn get_color_balance_range(&self) -> Result<IntRange, ClientError> {
        self.guard("get_color_balance_range")?;
        Ok(self.state.lock().unwrap().color_balance_range)
    }

    fn get_picture_adjustment(&self) -> Result<WireHsic, ClientError> {
        self.guard("get_picture_adjustment")?;
        Ok(self.state.lock().unwrap().picture_adjustment)
    }

    fn get_default_picture_adjustment(&self) -> Result<WireHsic, ClientError> {
        self.guard("get_default_picture_adjustment")?;
        Ok(self.state.lock().unwrap().default_picture_adjustment)
    }

    fn set_picture_adjustment(&self, hsic: WireHsic) -> Result<bool, ClientError> {
        self.guard("set_picture_adjustment")?;
        self.state.lock().unwrap().picture_adjustment = hsic;
        Ok(true)
    }

    fn get_hue_range(&self) -> Result<IntRange, ClientError> {
        self.guard("get_hue_range")?;
        Ok(IntRange { min: 0, max: 360 })
    }

    fn get_saturation_range(&self) -> Result<FloatRange, ClientError> {
        self.guard("get_saturation_range")?;
        Ok(FloatRange { min: 0.0, max: 2.0 })
    }

    fn get_intensity_range(&self) -> Result<FloatRange, ClientError> {
        self.guard("get_intensity_range")?;
        Ok(FloatRange { min: 0.0, max: 2.0 })
    }

    fn get_contrast_range(&self) -> Result<FloatRange, ClientError> {
        self.guard("get_contrast_range")?;
        Ok(FloatRange { min: 0.0, max: 2.0 })
    }

    fn get_saturation_threshold_range(&self) -> Result<FloatRange, ClientError> {
        self.guard("get_saturation_threshold_range")?;
        Ok(FloatRange { min: 0.0, max: 1.0 })
    }

    fn link_to_death(&self, recipient: DeathRecipient) -> Result<(), ClientError> {
        self.guard("link_to_death")?;
        self.recipients.lock().unwrap().push(recipient);
        Ok(())
    }
}

// =============================================================================
// MockRegistry
// =============================================================================

/// A [`ServiceRegistry`] serving one shared [`MockColorHal`].
///
/// Clones share the same mock service and counters, so a test can keep a
/// handle while the proxy owns the boxed registry.
///
/// # Example
///
/// ```
/// use livedisplay_client::{Feature, LiveDisplayProxy, MockRegistry};
///
/// let registry = MockRegistry::new();
/// registry.hal().set_features(Feature::DisplayModes.bit());
///
/// let proxy = LiveDisplayProxy::new(Box::new(registry.clone()));
/// assert!(proxy.has_feature(Feature::DisplayModes));
/// assert_eq!(registry.lookups(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    hal: Arc<MockColorHal>,
    absent: AtomicBool,
    lookups: AtomicUsize,
}

impl MockRegistry {
    /// Create a registry with a fresh mock service.
    pub fn new() -> Self {
        Self::with_hal(Arc::new(MockColorHal::new()))
    }

    /// Create a registry serving the given mock service.
    pub fn with_hal(hal: Arc<MockColorHal>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                hal,
                absent: AtomicBool::new(false),
                lookups: AtomicUsize::new(0),
            }),
        }
    }

    /// The mock service behind this registry.
    pub fn hal(&self) -> &MockColorHal {
        &self.inner.hal
    }

    /// Make lookups fail with "service not found".
    pub fn set_absent(&self, absent: bool) {
        self.inner.absent.store(absent, Ordering::SeqCst);
    }

    /// How many lookups the proxy has issued.
    pub fn lookups(&self) -> usize {
        self.inner.lookups.load(Ordering::SeqCst)
    }
}

impl ServiceRegistry for MockRegistry {
    fn get_service(&self, _name: &str) -> Result<Arc<dyn ColorHal>, ClientError> {
        self.inner.lookups.fetch_add(1, Ordering::SeqCst);
        if self.inner.absent.load(Ordering::SeqCst) {
            return Err(ClientError::ServiceNotFound);
        }
        Ok(Arc::clone(&self.inner.hal) as Arc<dyn ColorHal>)
    }
}
