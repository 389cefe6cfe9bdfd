use crate::error::{LoadError, Result};
use crate::memory::CHIP8_MAX_PROGRAM_BYTES;
use std::fs;
use std::path::Path;

/// read a ROM image off disk. ROMs are raw bytes, no header; anything too big
/// to fit above 0x200 is refused here rather than half-loaded later
pub fn read_rom(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)?;
    if bytes.len() > CHIP8_MAX_PROGRAM_BYTES {
        return Err(LoadError::RomTooLarge {
            size: bytes.len(),
            max: CHIP8_MAX_PROGRAM_BYTES,
        }
        .into());
    }
    log::info!("read {} byte ROM from {}", bytes.len(), path.display());
    Ok(bytes)
}
