use super::*;

fn encode(samples: &[i16]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[test]
fn duration_is_samples_over_rate() {
    let payload = encode(&vec![0i16; 120_000]);
    let buf = decode_narration(&payload, NARRATION_SAMPLE_RATE).unwrap();
    assert_eq!(buf.frame_count(), 120_000);
    assert!((buf.duration_secs() - 5.0).abs() < 1e-9);
}

#[test]
fn samples_scale_into_unit_range() {
    let buf = decode_narration(&encode(&[i16::MIN, -16384, 0, 16384, i16::MAX]), 24_000).unwrap();
    assert_eq!(buf.samples[0], -1.0);
    assert_eq!(buf.samples[1], -0.5);
    assert_eq!(buf.samples[2], 0.0);
    assert_eq!(buf.samples[3], 0.5);
    assert!(buf.samples[4] < 1.0 && buf.samples[4] > 0.9999);
    assert!(buf.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn odd_byte_count_is_a_decode_error() {
    let payload = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
    let err = decode_narration(&payload, 24_000).unwrap_err();
    assert!(matches!(err, WisdomError::Decode(_)));
}

#[test]
fn empty_and_invalid_payloads_are_decode_errors() {
    assert!(matches!(
        decode_narration("", 24_000).unwrap_err(),
        WisdomError::Decode(_)
    ));
    assert!(matches!(
        decode_narration("!!not base64!!", 24_000).unwrap_err(),
        WisdomError::Decode(_)
    ));
}

#[test]
fn stereo_requires_whole_frames() {
    assert!(decode_pcm_s16le(&[0, 0, 0, 0, 0, 0], 24_000, 2).is_err());
    let buf = decode_pcm_s16le(&[0, 0, 0, 0], 24_000, 2).unwrap();
    assert_eq!(buf.frame_count(), 1);
}

#[test]
fn f32le_and_wav_outputs() {
    let buf = AudioBuffer {
        sample_rate: 24_000,
        channels: 1,
        samples: vec![0.5, -0.25],
    };
    let mut raw = Vec::new();
    buf.write_f32le(&mut raw).unwrap();
    assert_eq!(raw.len(), 8);
    assert_eq!(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]), 0.5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("n.wav");
    buf.write_wav(&path).unwrap();
    let mut reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 24_000);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![16384, -8192]);
}

/// Accepts every write, fails on flush (a full disk behind a buffer).
struct FlushFails;

impl std::io::Write for FlushFails {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("no space left on device"))
    }
}

#[test]
fn f32le_flush_failure_is_reported() {
    let buf = AudioBuffer {
        sample_rate: 24_000,
        channels: 1,
        samples: vec![0.1; 16],
    };
    let err = buf
        .write_f32le(std::io::BufWriter::new(FlushFails))
        .unwrap_err();
    assert!(matches!(err, WisdomError::Encode(_)));
    assert!(err.to_string().contains("no space left"));
}
