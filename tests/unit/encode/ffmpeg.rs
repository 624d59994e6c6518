use super::*;

fn cfg() -> EncodeConfig {
    EncodeConfig {
        width: 10,
        height: 10,
        fps: 30,
        out_path: PathBuf::from("out/x.webm"),
        overwrite: true,
        format: RecordingFormat::WebmVp9Opus,
        video_bitrate: 8_000_000,
        audio: None,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(cfg().validate().is_ok());
    assert!(EncodeConfig { width: 0, ..cfg() }.validate().is_err());
    assert!(EncodeConfig { width: 11, ..cfg() }.validate().is_err());
    assert!(EncodeConfig { fps: 0, ..cfg() }.validate().is_err());

    let silent_audio = AudioInput {
        path: PathBuf::from("a.f32le"),
        sample_rate: 0,
        channels: 1,
    };
    assert!(
        EncodeConfig {
            audio: Some(silent_audio),
            ..cfg()
        }
        .validate()
        .is_err()
    );
}

#[test]
fn args_mux_narration_as_second_input() {
    let c = EncodeConfig {
        audio: Some(AudioInput {
            path: PathBuf::from("/tmp/n.f32le"),
            sample_rate: 24_000,
            channels: 1,
        }),
        ..cfg()
    };
    let args = c.args();
    assert_eq!(args[0], "-y");
    assert!(args.windows(2).any(|w| w == ["-s", "10x10"]));
    assert!(args.windows(2).any(|w| w == ["-ar", "24000"]));
    assert!(args.windows(2).any(|w| w == ["-map", "1:a"]));
    assert!(args.windows(2).any(|w| w == ["-c:v", "libvpx-vp9"]));
    assert_eq!(args.last().map(String::as_str), Some("out/x.webm"));

    let silent = cfg().args();
    assert!(silent.iter().any(|a| a == "-an"));
    assert!(!silent.iter().any(|a| a == "f32le"));
}

#[test]
fn flatten_premul_over_black() {
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_white() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![255, 255, 255, 255]);
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a/b/c.webm");
    ensure_parent_dir(&path).unwrap();
    assert!(dir.path().join("a/b").is_dir());
    ensure_parent_dir(Path::new("bare.webm")).unwrap();
}
