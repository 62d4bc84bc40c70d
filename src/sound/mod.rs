// Sound-file decoding
//
// Decodes WAV bytes into interleaved f32 samples suitable for the audio
// session's clip exchange. Integer PCM is scaled to [-1, 1]; float data
// passes through unchanged.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::error::SoundError;

/// Decoded audio clip, interleaved f32.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    pub samples: Vec<f32>,
    pub channel_count: u16,
    pub sample_rate: u32,
}

/// Decode a WAV file held in memory.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedClip, SoundError> {
    let mut reader = WavReader::new(Cursor::new(bytes)).map_err(|e| SoundError::DecodeFailed {
        reason: e.to_string(),
    })?;
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SoundError::DecodeFailed {
                reason: e.to_string(),
            })?,
        (SampleFormat::Int, bits @ (16 | 24 | 32)) => {
            let scale = 1.0 / (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SoundError::DecodeFailed {
                    reason: e.to_string(),
                })?
        }
        (format, bits) => {
            return Err(SoundError::UnsupportedFormat {
                format: format!("{:?} {}-bit", format, bits),
            })
        }
    };

    debug!(
        "decoded wav: {} Hz, {} channel(s), {} samples",
        spec.sample_rate,
        spec.channels,
        samples.len()
    );

    Ok(DecodedClip {
        samples,
        channel_count: spec.channels,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<Cursor<&mut Vec<u8>>>)) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        write(&mut writer);
        writer.finalize().unwrap();
        bytes
    }

    #[test]
    fn test_decode_float_wav() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [0.5_f32, -0.5, 0.25] {
                w.write_sample(s).unwrap();
            }
        });

        let clip = decode_wav(&bytes).unwrap();
        assert_eq!(clip.sample_rate, 48000);
        assert_eq!(clip.channel_count, 1);
        assert_eq!(clip.samples, vec![0.5, -0.5, 0.25]);
    }

    #[test]
    fn test_decode_int16_wav_scales_to_unit_range() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [i16::MAX, i16::MIN, 0, 16384] {
                w.write_sample(s).unwrap();
            }
        });

        let clip = decode_wav(&bytes).unwrap();
        assert_eq!(clip.channel_count, 2);
        assert_eq!(clip.samples.len(), 4);
        assert!((clip.samples[0] - 1.0).abs() < 1e-3);
        assert_eq!(clip.samples[1], -1.0);
        assert_eq!(clip.samples[2], 0.0);
        assert!((clip.samples[3] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = decode_wav(b"RIFFnot really a wav file");
        assert!(matches!(result, Err(SoundError::DecodeFailed { .. })));
    }

    #[test]
    fn test_empty_bytes_fail_to_decode() {
        let result = decode_wav(&[]);
        assert!(matches!(result, Err(SoundError::DecodeFailed { .. })));
    }

    #[test]
    fn test_unsupported_bit_depth_is_rejected() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            w.write_sample(0_i8).unwrap();
        });

        let result = decode_wav(&bytes);
        assert!(matches!(result, Err(SoundError::UnsupportedFormat { .. })));
    }
}
