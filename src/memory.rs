use crate::error::LoadError;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents an addressable memory. Every address is masked to the size of
/// the memory, so a stray index register can never reach past the end of it.
pub trait MemoryMap {
    /// a single byte; addr is masked
    fn get_byte(&self, addr: u16) -> u8;

    /// write a single byte; addr is masked
    fn set_byte(&mut self, addr: u16, value: u8);

    /// write a chunk of bytes, one masked address at a time
    fn write(&mut self, data: &[u8], addr: u16) {
        for (offset, byte) in data.iter().enumerate() {
            self.set_byte(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// get a big-endian two-byte word (opcodes)
    fn get_word(&self, addr: u16) -> u16 {
        ((self.get_byte(addr) as u16) << 8) | (self.get_byte(addr.wrapping_add(1)) as u16)
    }
}

/// Defines the CHIP-8 standard 4K memory map:
///   0x0000-0x004f  font
///   0x0050-0x01ff  interpreter (unused)
///   0x0200-0x0fff  program
///
/// the stack, registers and display live outside of this memory, in the
/// interpreter itself
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize]
    }

    fn set_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize] = value;
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// 12-bit address space
pub const CHIP8_ADDR_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// biggest ROM that fits above the program address
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// glyph n lives at n * 5, so Fx29 can point I straight at it
pub const CHIP8_FONT_ADDR: u16 = 0x000;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// load a CHIP-8 program at 0x200. anything left over from a previous
    /// program is cleared; the font is never touched
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(LoadError::RomTooLarge {
                size: program.len(),
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        let start = CHIP8_PROGRAM_ADDR as usize;
        self.bytes[start..].fill(0);
        self.bytes[start..start + program.len()].copy_from_slice(program);
        log::debug!("loaded {} byte program at {:#05x}", program.len(), start);
        Ok(())
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
