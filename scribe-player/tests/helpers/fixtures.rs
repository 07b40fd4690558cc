//! Transcript fixtures

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

/// Result document with four sentences over 120 seconds, two speakers
///
/// Sentence 2 is followed by a gap (45..60) with no speech.
pub fn sample_result() -> serde_json::Value {
    json!({
        "success": true,
        "result_id": "res-001",
        "text": "welcome everyone. today we talk about seeking. it is async. questions?",
        "sentences": [
            {"text": "welcome everyone.", "start": 0.0, "end": 12.0, "speaker": 0,
             "translation": {"zh": "欢迎大家。", "en": "welcome everyone.", "source_lang": "en"}},
            {"text": "today we talk about seeking.", "start": 12.0, "end": 30.0, "speaker": 0,
             "translation": {"zh": "", "en": "", "source_lang": "en"}},
            {"text": "it is async.", "start": 30.0, "end": 45.0, "speaker": 1,
             "translation": {"zh": "", "en": "", "source_lang": "en"}},
            {"text": "questions?", "start": 60.0, "end": 75.5, "speaker": 1,
             "translation": {"zh": "", "en": "", "source_lang": "en"}}
        ],
        "speakers": [0, 1],
        "total_duration": 120.0,
        "audio_hash": "0f0f",
        "filename": "lecture.wav",
        "timestamp": "2024-05-01T10:00:00",
        "message": "done",
        "audio_path": "/data/lecture.wav",
        "processing_time": 4.2
    })
}

/// Write `value` to `result.json` inside a fresh temp dir
///
/// The TempDir must be kept alive for as long as the file is used.
pub fn write_result_file(value: &serde_json::Value) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("result.json");
    let mut file = std::fs::File::create(&path).expect("create result file");
    file.write_all(value.to_string().as_bytes())
        .expect("write result file");
    (dir, path)
}
