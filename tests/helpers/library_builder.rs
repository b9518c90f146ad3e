//! Listening test library fixture generator
//!
//! Builds on-disk libraries shaped like the ones the service scans:
//! `base/original/*.{wav,flac}` plus one sibling folder per method.

use std::fs;
use std::path::Path;

/// Declarative library layout for a test
pub struct LibrarySpec<'a> {
    /// File names placed in `original/`
    pub files: &'a [&'a str],
    /// Method folder names
    pub methods: &'a [&'a str],
    /// (method, file) pairs deliberately left out of the method folder
    pub missing: &'a [(&'a str, &'a str)],
}

/// Write a small but real audio file at `path`
///
/// `.wav` files get an actual PCM tone via hound so browser playback in
/// manual runs works too; other extensions just need bytes on disk.
pub fn write_test_audio(path: &Path) {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    if is_wav {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..800 {
            let t = i as f64 / 8000.0;
            let sample = (t * 440.0 * 2.0 * std::f64::consts::PI).sin();
            writer.write_sample((sample * i16::MAX as f64 * 0.3) as i16).unwrap();
        }
        writer.finalize().unwrap();
    } else {
        fs::write(path, b"fLaC-test-fixture").unwrap();
    }
}

/// Materialize a [`LibrarySpec`] under `base`
pub fn build_library(base: &Path, spec: &LibrarySpec<'_>) {
    let original = base.join("original");
    fs::create_dir_all(&original).unwrap();
    for file in spec.files {
        write_test_audio(&original.join(file));
    }

    for method in spec.methods {
        let method_dir = base.join(method);
        fs::create_dir_all(&method_dir).unwrap();
        for file in spec.files {
            if spec.missing.contains(&(*method, *file)) {
                continue;
            }
            write_test_audio(&method_dir.join(file));
        }
    }
}
