use std::io;
use thiserror::Error;

/// Failures loading a program into memory. The caller may pick another ROM.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("ROM is {size} bytes but only {max} fit above 0x200")]
    RomTooLarge { size: usize, max: usize },
}

/// Failures raised by a single `step`. None of these panic the process; the
/// emulated program is broken but the host decides what to do about it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("unknown opcode {0:#06x}")]
    UnknownOpcode(u16),
    #[error("call stack overflow")]
    StackOverflow,
    #[error("return with an empty call stack")]
    StackUnderflow,
    #[error("key index {0:#04x} is not a hex key")]
    InvalidKeyIndex(u8),
}

/// Everything that can stop the emulator from the outside: storage, devices
/// and the core itself.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("execution error at {pc:#05x}: {source}")]
    Execution {
        pc: u16,
        #[source]
        source: ExecutionError,
    },
    #[error("sound error: {0}")]
    Sound(String),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
