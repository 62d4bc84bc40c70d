// Crispin Native Core - Rust audio/font/sound bridge
// Real-time playback session plus glyph rasterization and sound-file decoding
// for the managed engine

// Module declarations
pub mod audio;
pub mod config;
pub mod context;
pub mod error;
pub mod font;
pub mod sound;

#[cfg(target_os = "android")]
pub mod api;

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        fn init_logging() {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(log::LevelFilter::Debug)
                    .with_tag("CrispinNative"),
            );
        }
    } else {
        /// Initialize logging for desktop runs. Safe to call repeatedly.
        pub fn init_logging() {
            let _ = env_logger::builder().try_init();
        }
    }
}

/// JNI_OnLoad is called when the native library is loaded by the Android runtime.
/// It initializes logging and the Android context required by oboe-rs.
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(
    vm: jni::JavaVM,
    _reserved: *mut std::ffi::c_void,
) -> jni::sys::jint {
    init_logging();

    log::info!("JNI_OnLoad called - initializing Android context");

    // SAFETY: the JavaVM pointer stays valid for the process lifetime; oboe
    // only needs the VM so the audio subsystem can attach its threads.
    unsafe {
        ndk_context::initialize_android_context(
            vm.get_java_vm_pointer() as *mut std::ffi::c_void,
            std::ptr::null_mut(),
        );
    }

    jni::sys::JNI_VERSION_1_6
}
