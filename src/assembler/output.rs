//! Output artifact emission: the flat binary, the reserved-memory segment
//! and the loader metadata object.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::core::assembler::error::{AsmError, AsmErrorKind};
use crate::core::image::ImageBuffer;

/// Size of the zero-filled reserved segment the loader expects to exist.
pub(super) const BSS_SIZE: usize = 0x10;

#[derive(Debug, Clone)]
pub(super) struct OutputPaths {
    pub data: PathBuf,
    pub bss: PathBuf,
    pub json: PathBuf,
}

pub(super) fn resolve_output_paths(base: &str) -> OutputPaths {
    OutputPaths {
        data: PathBuf::from(format!("{base}.data")),
        bss: PathBuf::from(format!("{base}.bss")),
        json: PathBuf::from(format!("{base}.json")),
    }
}

/// Loader metadata. The raw/bss references point at the files actually
/// written; entry point, program origin and the function table are fixed
/// placeholder values the loader currently accepts as-is.
pub(super) fn build_metadata(outputs: &OutputPaths) -> serde_json::Value {
    json!({
        "ok": true,
        "bss": path_text(&outputs.bss),
        "po": 0,
        "eov": 0,
        "raw": path_text(&outputs.data),
        "ep": 0,
        "row": 0,
        "text": "",
        "token": "",
        "functions": [
            {
                "offset": 0,
                "name": "main"
            }
        ],
    })
}

/// Write all three artifacts. Called only after every pass has succeeded,
/// so a failed run never leaves output files behind.
pub(super) fn write_outputs(image: &ImageBuffer, outputs: &OutputPaths) -> Result<(), AsmError> {
    write_file(&outputs.data, image.bytes())?;
    write_file(&outputs.bss, &[0u8; BSS_SIZE])?;
    let mut serialized = serde_json::to_string_pretty(&build_metadata(outputs))
        .map_err(|err| AsmError::new(AsmErrorKind::Io, &err.to_string(), None))?;
    serialized.push('\n');
    write_file(&outputs.json, serialized.as_bytes())
}

fn write_file(path: &Path, payload: &[u8]) -> Result<(), AsmError> {
    fs::write(path, payload).map_err(|err| {
        let path_text = path.to_string_lossy().to_string();
        AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(&path_text))
    })
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
