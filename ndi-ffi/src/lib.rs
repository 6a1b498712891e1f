//! NDI FFI - C Foreign Function Interface
//!
//! The C side of the plugin fills an `ObsHostApi` and an `NdiLibApi` table,
//! calls `obs_ndi_output_info` once and registers the returned
//! `ObsOutputInfo` with the host.

use std::ffi::{CStr, CString};
use std::ptr::{self, NonNull};
use std::sync::OnceLock;

use libc::{c_char, c_void};
use log::{debug, error, info};
use ndi_audio::AudioData;
use ndi_output::{MemorySettings, NdiOutput, PropertyKind, NDI_OUTPUT_INFO};
use ndi_video::VideoData;

pub mod host;
pub mod logging;
pub mod ndi;

pub use host::*;
pub use ndi::*;

type Instance = NdiOutput<ObsOutputHost, NdiLib>;

/// Output callbacks in the layout the C side registers
#[repr(C)]
pub struct ObsOutputInfo {
    pub id: *const c_char,
    pub flags: u32,
    pub get_name: unsafe extern "C" fn(type_data: *mut c_void) -> *const c_char,
    pub create: unsafe extern "C" fn(settings: *mut ObsData, output: *mut ObsOutput) -> *mut c_void,
    pub destroy: unsafe extern "C" fn(data: *mut c_void),
    pub start: unsafe extern "C" fn(data: *mut c_void) -> bool,
    pub stop: unsafe extern "C" fn(data: *mut c_void, ts: u64),
    pub raw_video: unsafe extern "C" fn(data: *mut c_void, frame: *mut VideoData),
    pub raw_audio: unsafe extern "C" fn(data: *mut c_void, frames: *mut AudioData),
    pub get_defaults: unsafe extern "C" fn(settings: *mut ObsData),
    pub get_properties: unsafe extern "C" fn(data: *mut c_void) -> *mut ObsProperties,
    pub update: unsafe extern "C" fn(data: *mut c_void, settings: *mut ObsData),
}

struct Plugin {
    host: ObsHostApi,
    ndi: NdiLibApi,
    /// Backs `info.id`
    _id: CString,
    name_key: CString,
    info: ObsOutputInfo,
}

// `info.id` points into `_id`, which lives as long as the plugin.
unsafe impl Send for Plugin {}
unsafe impl Sync for Plugin {}

static PLUGIN: OnceLock<Plugin> = OnceLock::new();

fn plugin() -> Option<&'static Plugin> {
    PLUGIN.get()
}

fn static_cstring(value: &str) -> CString {
    CString::new(value).unwrap_or_default()
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Bind the host and SDK tables and return the output description
///
/// Only the first call binds tables; later calls return the same
/// description.
///
/// # Safety
/// `host` and `ndi` must point to valid tables. Their functions must stay
/// callable for the life of the process.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_info(
    host: *const ObsHostApi,
    ndi: *const NdiLibApi,
) -> *const ObsOutputInfo {
    if host.is_null() || ndi.is_null() {
        return ptr::null();
    }
    let (host, ndi) = (*host, *ndi);

    let plugin = PLUGIN.get_or_init(|| {
        logging::install(host.log);

        let id = static_cstring(NDI_OUTPUT_INFO.id);
        let info = ObsOutputInfo {
            id: id.as_ptr(),
            flags: NDI_OUTPUT_INFO.flags.bits(),
            get_name: obs_ndi_output_get_name,
            create: obs_ndi_output_create,
            destroy: obs_ndi_output_destroy,
            start: obs_ndi_output_start,
            stop: obs_ndi_output_stop,
            raw_video: obs_ndi_output_raw_video,
            raw_audio: obs_ndi_output_raw_audio,
            get_defaults: obs_ndi_output_get_defaults,
            get_properties: obs_ndi_output_get_properties,
            update: obs_ndi_output_update,
        };
        debug!("[obs-ndi] registered output '{}'", NDI_OUTPUT_INFO.id);

        Plugin {
            host,
            ndi,
            _id: id,
            name_key: static_cstring(NDI_OUTPUT_INFO.name_key),
            info,
        }
    });
    &plugin.info
}

// ============================================================================
// OUTPUT CALLBACKS
// ============================================================================

/// Localized display name
///
/// # Safety
/// Safe to call; returns null before registration.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_get_name(_type_data: *mut c_void) -> *const c_char {
    match plugin() {
        Some(plugin) => plugin
            .host
            .module_text(&plugin.name_key)
            .unwrap_or(plugin.name_key.as_ptr()),
        None => ptr::null(),
    }
}

/// Property sheet with the sender name field
///
/// # Safety
/// Safe to call; returns null before registration.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_get_properties(_data: *mut c_void) -> *mut ObsProperties {
    let Some(plugin) = plugin() else {
        return ptr::null_mut();
    };
    let sheet = NDI_OUTPUT_INFO.properties();

    let props = (plugin.host.properties_create)();
    if props.is_null() {
        return props;
    }
    if sheet.defer_update {
        (plugin.host.properties_set_flags)(props, PROPERTIES_DEFER_UPDATE);
    }
    for item in &sheet.items {
        let name = static_cstring(item.name);
        let label_key = static_cstring(item.label_key);
        let label = plugin
            .host
            .module_text(&label_key)
            .unwrap_or(label_key.as_ptr());
        match item.kind {
            PropertyKind::Text => {
                (plugin.host.properties_add_text)(props, name.as_ptr(), label, TEXT_DEFAULT)
            }
        }
    }
    props
}

/// Register default settings
///
/// # Safety
/// `settings` must be a valid host settings object or null.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_get_defaults(settings: *mut ObsData) {
    let (Some(plugin), Some(settings)) = (plugin(), NonNull::new(settings)) else {
        return;
    };
    NDI_OUTPUT_INFO.defaults(&mut ObsSettings::new(&plugin.host, settings));
}

/// Create an output instance
///
/// # Safety
/// `output` must be the host output the instance belongs to and must
/// outlive it. `settings` must be a valid settings object or null.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_create(
    settings: *mut ObsData,
    output: *mut ObsOutput,
) -> *mut c_void {
    let Some(plugin) = plugin() else {
        error!("[obs-ndi] output created before registration");
        return ptr::null_mut();
    };
    let Some(output) = NonNull::new(output) else {
        return ptr::null_mut();
    };

    let host = ObsOutputHost::new(&plugin.host, output);
    let sdk = NdiLib::new(&plugin.ndi);
    let instance = match NonNull::new(settings) {
        Some(settings) => Instance::new(host, sdk, &ObsSettings::new(&plugin.host, settings)),
        None => Instance::new(host, sdk, &MemorySettings::with_defaults()),
    };

    Box::into_raw(Box::new(instance)) as *mut c_void
}

/// Destroy an output instance
///
/// # Safety
/// Caller must ensure data is valid and not already freed.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_destroy(data: *mut c_void) {
    if !data.is_null() {
        Box::from_raw(data as *mut Instance).destroy();
    }
}

/// Start sending
///
/// # Safety
/// Caller must ensure data is valid.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_start(data: *mut c_void) -> bool {
    if data.is_null() {
        return false;
    }
    let instance = &*(data as *const Instance);
    instance.start().is_ok()
}

/// Stop sending
///
/// # Safety
/// Caller must ensure data is valid.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_stop(data: *mut c_void, _ts: u64) {
    if data.is_null() {
        return;
    }
    let instance = &*(data as *const Instance);
    instance.stop();
}

/// Apply new settings
///
/// # Safety
/// Caller must ensure data and settings are valid.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_update(data: *mut c_void, settings: *mut ObsData) {
    let (Some(plugin), Some(settings)) = (plugin(), NonNull::new(settings)) else {
        return;
    };
    if data.is_null() {
        return;
    }
    let instance = &*(data as *const Instance);
    instance.update(&ObsSettings::new(&plugin.host, settings));
}

/// Send one video frame
///
/// # Safety
/// Caller must ensure data is valid and frame describes the negotiated
/// video mix.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_raw_video(data: *mut c_void, frame: *mut VideoData) {
    if data.is_null() || frame.is_null() {
        return;
    }
    let instance = &*(data as *const Instance);
    instance.raw_video(&*frame);
}

/// Send one audio frame
///
/// # Safety
/// Caller must ensure data is valid and frames describes the negotiated
/// audio mix.
#[no_mangle]
pub unsafe extern "C" fn obs_ndi_output_raw_audio(data: *mut c_void, frames: *mut AudioData) {
    if data.is_null() || frames.is_null() {
        return;
    }
    let instance = &*(data as *const Instance);
    instance.raw_audio(&*frames);
}

// ============================================================================
// UTILITY FUNCTIONS
// ============================================================================

/// Get library version string
///
/// # Safety
/// Returns a static string, safe to call.
#[no_mangle]
pub extern "C" fn obs_ndi_output_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Log the plugin banner
///
/// # Safety
/// Safe to call.
#[no_mangle]
pub extern "C" fn obs_ndi_output_log_version() {
    // SAFETY: obs_ndi_output_version returns a static NUL-terminated string.
    let version = unsafe { CStr::from_ptr(obs_ndi_output_version()) };
    info!("[obs-ndi] ndi output version {}", version.to_string_lossy());
}
