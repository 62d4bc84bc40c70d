// JNI surface for the managed engine
//
// Every function translates parameters across the boundary, delegates to the
// NativeContext, and reports failure as a boolean / empty array plus a logged
// diagnostic. Nothing here panics across the FFI boundary.

#![allow(dead_code)] // entry points are called from the managed runtime

use jni::objects::{JByteArray, JClass, JFloatArray};
use jni::sys::{jboolean, jbyte, jbyteArray, jint, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use log::error;
use once_cell::sync::Lazy;

use crate::context::NativeContext;

/// Process-wide context; the session inside follows the host resume/pause
/// lifecycle even though this anchor lives for the process.
static CONTEXT: Lazy<NativeContext> = Lazy::new(NativeContext::new);

fn as_jboolean(ok: bool) -> jboolean {
    if ok {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// Host resume hook: open and start the playback stream.
#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_initAudioEngine(
    _env: JNIEnv,
    _class: JClass,
) -> jboolean {
    as_jboolean(CONTEXT.start_audio().is_ok())
}

/// Host pause hook: stop the stream and release the session.
#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_stopAudioEngine(
    _env: JNIEnv,
    _class: JClass,
) -> jboolean {
    as_jboolean(CONTEXT.stop_audio().is_ok())
}

/// Replace the pending clip with the supplied samples.
#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_setAudioData(
    mut env: JNIEnv,
    _class: JClass,
    samples: JFloatArray,
) -> jboolean {
    let len = match env.get_array_length(&samples) {
        Ok(len) => len as usize,
        Err(e) => {
            error!("setAudioData: failed to read array length: {:?}", e);
            return JNI_FALSE;
        }
    };

    let mut buffer = vec![0.0_f32; len];
    if let Err(e) = env.get_float_array_region(&samples, 0, &mut buffer) {
        error!("setAudioData: failed to copy samples: {:?}", e);
        return JNI_FALSE;
    }

    as_jboolean(CONTEXT.set_audio_data(&buffer).is_ok())
}

/// Decode a sound file supplied as bytes and queue it for playback.
#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_loadAudio(
    mut env: JNIEnv,
    _class: JClass,
    file_bytes: JByteArray,
) -> jboolean {
    let bytes = match env.convert_byte_array(&file_bytes) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("loadAudio: failed to copy file bytes: {:?}", e);
            return JNI_FALSE;
        }
    };

    as_jboolean(CONTEXT.load_audio(&bytes).is_ok())
}

/// Rasterize one character from the supplied font bytes.
///
/// Returns the coverage bitmap (width * height bytes); an empty array on
/// failure, with the diagnostic in the log.
#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_loadCharacter(
    mut env: JNIEnv,
    _class: JClass,
    font_bytes: JByteArray,
    the_char: jbyte,
    font_size: jint,
) -> jbyteArray {
    let bytes = match env.convert_byte_array(&font_bytes) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("loadCharacter: failed to copy font bytes: {:?}", e);
            return std::ptr::null_mut();
        }
    };

    let ch = the_char as u8 as char;
    let bitmap = match CONTEXT.load_glyph(&bytes, ch, font_size.max(0) as u32) {
        Ok(bitmap) => bitmap,
        Err(_) => Vec::new(), // already logged; hand back an empty array
    };

    match env.byte_array_from_slice(&bitmap) {
        Ok(array) => array.into_raw(),
        Err(e) => {
            error!("loadCharacter: failed to build result array: {:?}", e);
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_getFaceBearingX(
    _env: JNIEnv,
    _class: JClass,
) -> jint {
    CONTEXT.glyph_bearing_x().unwrap_or(0)
}

#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_getFaceBearingY(
    _env: JNIEnv,
    _class: JClass,
) -> jint {
    CONTEXT.glyph_bearing_y().unwrap_or(0)
}

#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_getFaceAdvance(
    _env: JNIEnv,
    _class: JClass,
) -> jint {
    CONTEXT.glyph_advance().unwrap_or(0)
}

#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_getFaceWidth(
    _env: JNIEnv,
    _class: JClass,
) -> jint {
    CONTEXT.glyph_width().unwrap_or(0)
}

#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_getFaceHeight(
    _env: JNIEnv,
    _class: JClass,
) -> jint {
    CONTEXT.glyph_height().unwrap_or(0)
}

/// Drop the currently held glyph.
#[no_mangle]
pub extern "system" fn Java_com_crispin_crispinmobile_Native_CrispinNativeInterface_freeFace(
    _env: JNIEnv,
    _class: JClass,
) {
    let _ = CONTEXT.free_glyph();
}
