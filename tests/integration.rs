use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use pretty_assertions::assert_eq;

use chatcontacts::core::model::{BatchResult, Detection};
use chatcontacts::export::{Exporter, HtmlReportExporter, JsonExporter, TextExporter};
use chatcontacts::ocr::{OcrEngine, SidecarEngine};
use chatcontacts::pipeline::{self, PipelineConfig};
use chatcontacts::{ExtractionConfig, RecordAssembler};

fn temp_dir(prefix: &str) -> PathBuf {
    let mut out = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    out.push(format!("{prefix}-{}-{now}", std::process::id()));
    out
}

fn sara_detections() -> Vec<Detection> {
    vec![
        Detection::new("Sara", 0.98, 5.0),
        Detection::new("Sunday", 0.95, 15.0),
        Detection::new("10:30", 0.91, 16.0),
        Detection::new("+966 55 111 2222", 0.88, 40.0),
        Detection::new("مرحبا كيف حالك", 0.83, 60.0),
    ]
}

/// Full record for a typical chat header + one message
#[test]
fn test_assemble_chat_screenshot() -> Result<()> {
    let assembler = RecordAssembler::new(&ExtractionConfig::default())?;
    let record = assembler.assemble("chat_01.png", &sara_detections());

    assert_eq!(record.image, "chat_01.png");
    assert_eq!(record.name(), Some("Sara"));
    assert_eq!(record.timestamp.as_deref(), Some("Sunday 10:30"));
    let numbers: Vec<&str> = record.phone_numbers.iter().map(|n| n.as_str()).collect();
    assert_eq!(numbers, vec!["+966551112222"]);
    assert_eq!(record.messages, vec!["مرحبا كيف حالك"]);
    assert_eq!(record.block_count, 5);
    assert_eq!(
        record.raw_text,
        "Sara Sunday 10:30 +966 55 111 2222 مرحبا كيف حالك"
    );
    Ok(())
}

#[test]
fn test_shuffled_detections_give_same_fields() -> Result<()> {
    let assembler = RecordAssembler::new(&ExtractionConfig::default())?;
    let ordered = assembler.assemble("x.png", &sara_detections());

    let mut shuffled = sara_detections();
    shuffled.reverse();
    let reversed = assembler.assemble("x.png", &shuffled);

    assert_eq!(reversed.names, ordered.names);
    assert_eq!(reversed.timestamp, ordered.timestamp);
    assert_eq!(reversed.phone_numbers, ordered.phone_numbers);
    assert_eq!(reversed.messages, ordered.messages);
    assert_ne!(reversed.raw_text, ordered.raw_text);
    Ok(())
}

#[test]
fn test_empty_screenshot() -> Result<()> {
    let assembler = RecordAssembler::new(&ExtractionConfig::default())?;
    let record = assembler.assemble("blank.png", &[]);

    assert_eq!(record.block_count, 0);
    assert!(record.phone_numbers.is_empty());
    assert!(record.messages.is_empty());
    assert_eq!(record.name(), None);
    assert_eq!(record.timestamp, None);
    assert_eq!(record.raw_text, "");
    Ok(())
}

#[test]
fn test_config_file_swaps_region_and_vocabulary() -> Result<()> {
    let dir = temp_dir("chatcontacts-config");
    fs::create_dir_all(&dir)?;
    let path = dir.join("egypt.toml");
    fs::write(
        &path,
        r#"
default_region = "+20"

[locale]
ui_chrome = ["edit", "back", "info"]
"#,
    )?;

    let config = ExtractionConfig::load(&path)?;
    let assembler = RecordAssembler::new(&config)?;
    let record = assembler.assemble(
        "cairo.png",
        &[
            Detection::new("Info", 0.9, 1.0),
            Detection::new("Mona", 0.9, 2.0),
            Detection::new("0123456789", 0.9, 30.0),
        ],
    );

    assert_eq!(record.name(), Some("Mona"));
    let numbers: Vec<&str> = record.phone_numbers.iter().map(|n| n.as_str()).collect();
    assert_eq!(numbers, vec!["+20123456789"]);

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

struct ScriptedEngine;

impl OcrEngine for ScriptedEngine {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        match image.file_name().and_then(|n| n.to_str()) {
            Some("chat_01.png") => Ok(sara_detections()),
            Some("chat_02.png") => Ok(vec![
                Detection::new("Back", 0.99, 2.0),
                Detection::new("Ahmed", 0.97, 6.0),
                Detection::new("Tuesday", 0.9, 10.0),
                Detection::new("14:05", 0.9, 11.0),
                Detection::new("رقمي 0551112222", 0.8, 50.0),
                Detection::new("966501234567", 0.8, 70.0),
            ]),
            _ => anyhow::bail!("unreadable image"),
        }
    }
}

/// Batch over three images, one of which the engine cannot read
#[test]
fn test_batch_with_failure_and_exports() -> Result<()> {
    let assembler = RecordAssembler::new(&ExtractionConfig::default())?;
    let images = vec![
        PathBuf::from("shots/chat_01.png"),
        PathBuf::from("shots/chat_02.png"),
        PathBuf::from("shots/broken.png"),
    ];
    let batch = pipeline::run_batch(&images, &ScriptedEngine, &assembler);

    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].image, "broken.png");

    let second = &batch.records[1];
    assert_eq!(second.name(), Some("Ahmed"));
    assert_eq!(second.timestamp.as_deref(), Some("Tuesday 14:05"));

    let unique: Vec<&str> = batch.unique_numbers().iter().map(|n| n.as_str()).collect();
    assert_eq!(unique, vec!["+966501234567", "+966551112222"]);

    let rows = batch.phone_rows();
    assert_eq!(rows.len(), 3);
    assert!(rows
        .iter()
        .all(|row| row.name == Some("Sara") || row.name == Some("Ahmed")));

    let out = temp_dir("chatcontacts-export");
    JsonExporter::new(out.clone()).export(&batch)?;
    TextExporter::new(out.clone()).export(&batch)?;
    HtmlReportExporter::new(out.clone()).export(&batch)?;

    let json = fs::read_to_string(out.join("records.json"))?;
    let parsed: BatchResult = serde_json::from_str(&json)?;
    assert_eq!(parsed.records, batch.records);
    assert_eq!(parsed.failures, batch.failures);

    assert_eq!(
        fs::read_to_string(out.join("phone_numbers.txt"))?,
        "+966501234567\n+966551112222\n"
    );
    assert!(fs::read_to_string(out.join("raw_text/chat_02.png.txt"))?.contains("Ahmed"));
    assert!(fs::read_to_string(out.join("report.html"))?.contains("Unique numbers (2)"));

    let _ = fs::remove_dir_all(&out);
    Ok(())
}

/// End to end from sidecar detection files, the offline replacement for OCR
#[test]
fn test_pipeline_run_with_sidecar_detections() -> Result<()> {
    let root = temp_dir("chatcontacts-sidecar-run");
    let shots = root.join("shots");
    let detections = root.join("detections");
    let output = root.join("out");
    fs::create_dir_all(&shots)?;
    fs::create_dir_all(&detections)?;

    fs::write(shots.join("chat_01.png"), b"not really a png")?;
    fs::write(
        detections.join("chat_01.json"),
        r#"[
            {"text": "Sara", "bbox": [[10, 5], [60, 5], [60, 20], [10, 20]], "confidence": 0.98},
            {"text": "Sunday", "bbox": [10, 30, 70, 44], "confidence": 0.95},
            {"text": "10:30", "bbox": [80, 31, 120, 44], "confidence": 0.9},
            {"text": "‏+٩٦٦ ٥٥ ١١١ ٢٢٢٢", "bbox": [10, 80, 200, 96], "confidence": 0.87},
            {"text": "ﻣﺮﺣﺒﺎ كيف حالك", "bbox": [10, 120, 200, 140], "confidence": 0.8}
        ]"#,
    )?;

    let config = PipelineConfig::new(vec![shots.clone()], output.clone());
    let engine = SidecarEngine::new(detections.clone());
    let batch = pipeline::run(&config, &engine)?;

    assert_eq!(batch.records.len(), 1);
    let record = &batch.records[0];
    assert_eq!(record.name(), Some("Sara"));
    assert_eq!(record.timestamp.as_deref(), Some("Sunday 10:30"));
    assert_eq!(record.phone_numbers[0].as_str(), "+966551112222");
    assert_eq!(record.messages, vec!["مرحبا كيف حالك"]);

    assert!(output.join("records.json").exists());
    assert!(output.join("phone_numbers.txt").exists());
    assert!(output.join("report.html").exists());

    let _ = fs::remove_dir_all(&root);
    Ok(())
}
