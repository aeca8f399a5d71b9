//! Vendor transport: the real [`ColorHal`] behind the client shared library.

use crate::error::ClientError;
use crate::hal::{ColorHal, DeathRecipient, ServiceRegistry};
use crate::wire::{FloatRange, IntRange, Mode, WireHsic};

use libloading::{Library, Symbol};
use log::{debug, info};
use std::ffi::{CStr, c_void};
use std::sync::{Arc, Mutex};

const VENDOR_LIB: &str = "liblivedisplay-color-client.so";

/// Upper bound on modes returned by one `GetDisplayModes` call.
const MAX_DISPLAY_MODES: usize = 32;
const MODE_NAME_LEN: usize = 64;

// =============================================================================
// C ABI types
// =============================================================================

#[repr(C)]
#[derive(Clone, Copy)]
struct RawMode {
    id: i32,
    name: [u8; MODE_NAME_LEN],
}

impl RawMode {
    fn empty() -> Self {
        Self {
            id: 0,
            name: [0; MODE_NAME_LEN],
        }
    }

    fn into_mode(self) -> Mode {
        let name = CStr::from_bytes_until_nul(&self.name)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&self.name).into_owned());
        Mode { id: self.id, name }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
struct RawHsic {
    hue: i32,
    saturation: f32,
    intensity: f32,
    contrast: f32,
    saturation_threshold: f32,
}

impl From<RawHsic> for WireHsic {
    fn from(r: RawHsic) -> Self {
        Self {
            hue: r.hue,
            saturation: r.saturation,
            intensity: r.intensity,
            contrast: r.contrast,
            saturation_threshold: r.saturation_threshold,
        }
    }
}

impl From<WireHsic> for RawHsic {
    fn from(w: WireHsic) -> Self {
        Self {
            hue: w.hue,
            saturation: w.saturation,
            intensity: w.intensity,
            contrast: w.contrast,
            saturation_threshold: w.saturation_threshold,
        }
    }
}

// =============================================================================
// VendorColorHal
// =============================================================================

/// [`ColorHal`] implementation backed by the vendor client library.
///
/// Every call resolves its symbol, invokes it with the opaque client
/// pointer, and maps a non-zero status to [`ClientError::Transport`].
pub struct VendorColorHal {
    lib: Library,
    client: *mut c_void,
    // Stable heap slot handed to the vendor death callback as its context.
    // The trampoline reads it for as long as the client is initialized;
    // Drop uninitializes the client (deregistering the callback) before
    // this is freed.
    death_hook: Box<Mutex<Option<DeathRecipient>>>,
}

// Safety: the client pointer is only passed to functions of `lib`, and the
// Library keeps the vendor code loaded for the lifetime of VendorColorHal.
// The vendor client is documented thread-safe.
unsafe impl Send for VendorColorHal {}
unsafe impl Sync for VendorColorHal {}

extern "C" fn death_trampoline(ctx: *mut c_void) {
    if ctx.is_null() {
        return;
    }
    // Safety: ctx is the death_hook slot registered at init; the Drop order
    // in VendorColorHal guarantees it outlives the registration.
    let hook = unsafe { &*(ctx as *const Mutex<Option<DeathRecipient>>) };
    if let Some(recipient) = hook.lock().unwrap().clone() {
        recipient();
    }
}

impl VendorColorHal {
    /// Load the vendor client library and initialize a client session.
    ///
    /// A missing library means the service is not present on this device
    /// and maps to [`ClientError::ServiceNotFound`].
    pub fn connect() -> Result<Self, ClientError> {
        debug!("loading {VENDOR_LIB}");
        let lib = unsafe { Library::new(VENDOR_LIB) }.map_err(|e| match e {
            libloading::Error::DlOpen { .. } => ClientError::ServiceNotFound,
            other => ClientError::LibraryLoad(other),
        })?;

        unsafe {
            type InitFn = unsafe extern "C" fn(*mut *mut c_void) -> i64;
            let init: Symbol<InitFn> = lib.get(b"LiveDisplayClientInitialize")?;

            let mut client: *mut c_void = std::ptr::null_mut();
            let status = init(&mut client);
            if status != 0 || client.is_null() {
                return Err(ClientError::InitFailed(status));
            }

            let death_hook: Box<Mutex<Option<DeathRecipient>>> = Box::new(Mutex::new(None));

            type DeathCb = extern "C" fn(*mut c_void);
            type SetDeathCbFn = unsafe extern "C" fn(DeathCb, *mut c_void, *mut c_void);
            let set_death_cb: Symbol<SetDeathCbFn> = lib.get(b"LiveDisplaySetDeathCallback")?;
            set_death_cb(
                death_trampoline,
                &*death_hook as *const Mutex<Option<DeathRecipient>> as *mut c_void,
                client,
            );

            info!("vendor color client initialized");
            Ok(Self {
                lib,
                client,
                death_hook,
            })
        }
    }

    fn get_u32(&self, call: &'static str) -> Result<u32, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut u32) -> i64;
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let mut out = 0u32;
            let status = func(self.client, &mut out);
            check(call, status)?;
            Ok(out)
        }
    }

    fn get_i32(&self, call: &'static str) -> Result<i32, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut i32) -> i64;
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let mut out = 0i32;
            let status = func(self.client, &mut out);
            check(call, status)?;
            Ok(out)
        }
    }

    fn get_bool(&self, call: &'static str) -> Result<bool, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut u8) -> i64;
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let mut out = 0u8;
            let status = func(self.client, &mut out);
            check(call, status)?;
            Ok(out != 0)
        }
    }

    fn get_mode(&self, call: &'static str) -> Result<Mode, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut RawMode) -> i64;
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let mut out = RawMode::empty();
            let status = func(self.client, &mut out);
            check(call, status)?;
            Ok(out.into_mode())
        }
    }

    fn get_int_range(&self, call: &'static str) -> Result<IntRange, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut i32, *mut i32) -> i64;
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let (mut min, mut max) = (0i32, 0i32);
            let status = func(self.client, &mut min, &mut max);
            check(call, status)?;
            Ok(IntRange { min, max })
        }
    }

    fn get_float_range(&self, call: &'static str) -> Result<FloatRange, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut f32, *mut f32) -> i64;
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let (mut min, mut max) = (0f32, 0f32);
            let status = func(self.client, &mut min, &mut max);
            check(call, status)?;
            Ok(FloatRange { min, max })
        }
    }

    fn get_hsic(&self, call: &'static str) -> Result<WireHsic, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut RawHsic) -> i64;
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let mut out = RawHsic::default();
            let status = func(self.client, &mut out);
            check(call, status)?;
            Ok(out.into())
        }
    }

    fn set_bool(&self, call: &'static str, value: bool) -> Result<bool, ClientError> {
        unsafe {
            type SetFn = unsafe extern "C" fn(*mut c_void, u8, *mut u8) -> i64;
            let func: Symbol<SetFn> = self.lib.get(call.as_bytes())?;
            let mut accepted = 0u8;
            let status = func(self.client, value as u8, &mut accepted);
            check(call, status)?;
            Ok(accepted != 0)
        }
    }
}

fn check(call: &'static str, status: i64) -> Result<(), ClientError> {
    if status == 0 {
        Ok(())
    } else {
        Err(ClientError::Transport { call, status })
    }
}

impl ColorHal for VendorColorHal {
    fn get_supported_features(&self) -> Result<u32, ClientError> {
        self.get_u32("LiveDisplayGetSupportedFeatures")
    }

    fn get_display_modes(&self) -> Result<Vec<Mode>, ClientError> {
        unsafe {
            type GetFn = unsafe extern "C" fn(*mut c_void, *mut RawMode, i32, *mut i32) -> i64;
            let call = "LiveDisplayGetDisplayModes";
            let func: Symbol<GetFn> = self.lib.get(call.as_bytes())?;
            let mut raw = [RawMode::empty(); MAX_DISPLAY_MODES];
            let mut written = 0i32;
            let status = func(
                self.client,
                raw.as_mut_ptr(),
                MAX_DISPLAY_MODES as i32,
                &mut written,
            );
            check(call, status)?;
            let written = (written.max(0) as usize).min(MAX_DISPLAY_MODES);
            Ok(raw[..written].iter().map(|m| m.into_mode()).collect())
        }
    }

    fn get_current_display_mode(&self) -> Result<Mode, ClientError> {
        self.get_mode("LiveDisplayGetCurrentDisplayMode")
    }

    fn get_default_display_mode(&self) -> Result<Mode, ClientError> {
        self.get_mode("LiveDisplayGetDefaultDisplayMode")
    }

    fn set_display_mode(&self, id: i32, make_default: bool) -> Result<bool, ClientError> {
        unsafe {
            type SetFn = unsafe extern "C" fn(*mut c_void, i32, u8, *mut u8) -> i64;
            let call = "LiveDisplaySetDisplayMode";
            let func: Symbol<SetFn> = self.lib.get(call.as_bytes())?;
            let mut accepted = 0u8;
            let status = func(self.client, id, make_default as u8, &mut accepted);
            check(call, status)?;
            Ok(accepted != 0)
        }
    }

    fn get_adaptive_backlight_enabled(&self) -> Result<bool, ClientError> {
        self.get_bool("LiveDisplayGetAdaptiveBacklightEnabled")
    }

    fn set_adaptive_backlight_enabled(&self, enabled: bool) -> Result<bool, ClientError> {
        self.set_bool("LiveDisplaySetAdaptiveBacklightEnabled", enabled)
    }

    fn get_outdoor_mode_enabled(&self) -> Result<bool, ClientError> {
        self.get_bool("LiveDisplayGetOutdoorModeEnabled")
    }

    fn set_outdoor_mode_enabled(&self, enabled: bool) -> Result<bool, ClientError> {
        self.set_bool("LiveDisplaySetOutdoorModeEnabled", enabled)
    }

    fn get_color_balance(&self) -> Result<i32, ClientError> {
        self.get_i32("LiveDisplayGetColorBalance")
    }

    fn set_color_balance(&self, value: i32) -> Result<bool, ClientError> {
        unsafe {
            type SetFn = unsafe extern "C" fn(*mut c_void, i32, *mut u8) -> i64;
            let call = "LiveDisplaySetColorBalance";
            let func: Symbol<SetFn> = self.lib.get(call.as_bytes())?;
            let mut accepted = 0u8;
            let status = func(self.client, value, &mut accepted);
            check(call, status)?;
            Ok(accepted != 0)
        }
    }

    fn get_color_balance_range(&self) -> Result<IntRange, ClientError> {
        self.get_int_range("LiveDisplayGetColorBalanceRange")
    }

    fn get_picture_adjustment(&self) -> Result<WireHsic, ClientError> {
        self.get_hsic("LiveDisplayGetPictureAdjustment")
    }

    fn get_default_picture_adjustment(&self) -> Result<WireHsic, ClientError> {
        self.get_hsic("LiveDisplayGetDefaultPictureAdjustment")
    }

    fn set_picture_adjustment(&self, hsic: WireHsic) -> Result<bool, ClientError> {
        unsafe {
            type SetFn = unsafe extern "C" fn(*mut c_void, *const RawHsic, *mut u8) -> i64;
            let call = "LiveDisplaySetPictureAdjustment";
            let func: Symbol<SetFn> = self.lib.get(call.as_bytes())?;
            let raw = RawHsic::from(hsic);
            let mut accepted = 0u8;
            let status = func(self.client, &raw, &mut accepted);
            check(call, status)?;
            Ok(accepted != 0)
        }
    }

    fn get_hue_range(&self) -> Result<IntRange, ClientError> {
        self.get_int_range("LiveDisplayGetHueRange")
    }

    fn get_saturation_range(&self) -> Result<FloatRange, ClientError> {
        self.get_float_range("LiveDisplayGetSaturationRange")
    }

    fn get_intensity_range(&self) -> Result<FloatRange, ClientError> {
        self.get_float_range("LiveDisplayGetIntensityRange")
    }

    fn get_contrast_range(&self) -> Result<FloatRange, ClientError> {
        self.get_float_range("LiveDisplayGetContrastRange")
    }

    fn get_saturation_threshold_range(&self) -> Result<FloatRange, ClientError> {
        self.get_float_range("LiveDisplayGetSaturationThresholdRange")
    }

    fn link_to_death(&self, recipient: DeathRecipient) -> Result<(), ClientError> {
        *self.death_hook.lock().unwrap() = Some(recipient);
        Ok(())
    }
}

impl Drop for VendorColorHal {
    fn drop(&mut self) {
        unsafe {
            type UninitFn = unsafe extern "C" fn(*mut c_void);
            if let Ok(uninit) = self.lib.get::<UninitFn>(b"LiveDisplayClientUninitialize") {
                uninit(self.client);
            }
        }
    }
}

// =============================================================================
// VendorRegistry
// =============================================================================

/// [`ServiceRegistry`] that connects through the vendor client library.
#[derive(Debug, Default)]
pub struct VendorRegistry;

impl VendorRegistry {
    /// Create a registry for the on-device vendor library.
    pub fn new() -> Self {
        Self
    }
}

impl ServiceRegistry for VendorRegistry {
    fn get_service(&self, name: &str) -> Result<Arc<dyn ColorHal>, ClientError> {
        debug!("looking up {name}");
        Ok(Arc::new(VendorColorHal::connect()?))
    }
}
