use clap::ValueEnum;

/// timers, input polling and redraws all happen at this rate
pub const TIMER_HZ: u32 = 60;

/// COSMAC VIP-ish speed
const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;

/// which physical keys map onto the hex keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Keymap {
    /// left-hand block of a qwerty keyboard, 1234/qwer/asdf/zxcv
    Conventional,
    /// '0'-'9' and 'a'-'f' map to themselves
    Literal,
}

/// what the main loop does when the CHIP-8 program misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// stop the emulator and report the error
    Halt,
    /// log the error and carry on with the next instruction
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub instructions_per_second: u32,
    pub keymap: Keymap,
    pub error_policy: ErrorPolicy,
    pub mute: bool,
    /// stop after this many 60Hz frames; run until quit if None
    pub max_frames: Option<u64>,
}

impl Config {
    /// instructions run between two timer ticks, never less than one
    pub fn instructions_per_frame(&self) -> u32 {
        (self.instructions_per_second / TIMER_HZ).max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            keymap: Keymap::Conventional,
            error_policy: ErrorPolicy::Halt,
            mute: false,
            max_frames: None,
        }
    }
}
