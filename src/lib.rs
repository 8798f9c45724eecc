pub mod assemble;
pub mod classify;
pub mod config;
pub mod core;
pub mod export;
pub mod ocr;
pub mod phone;
pub mod pipeline;

pub use assemble::RecordAssembler;
pub use config::ExtractionConfig;
pub use crate::core::model::{BatchResult, Detection, FieldRole, ImageRecord, PhoneNumber};
