/// # interpreter
///
/// The CHIP-8 machine as a CHIP-8 program sees it:
///  V0-VF  16 8-bit registers; VF doubles as carry/borrow/collision flag
///  I      16-bit address register
///  PC     program counter                      -- 0x200, always within 12 bits
///  SP     number of live stack entries         -- 0x00, at most 16
///  DT     delay timer                          -- counts down at 60Hz
///  ST     sound timer                          -- counts down at 60Hz, beeps while non-zero
/// plus 4K of memory, a 64x32 monochrome display and a 16-key hex keypad.
///
/// The interpreter never talks to devices itself: something else calls
/// .step() as fast as it likes, .tick_timers() at 60Hz, .set_key() on
/// keypresses and reads .framebuffer() when .take_redraw_flag() says so.
use crate::error::{ExecutionError, LoadError};
use crate::instruction::{Instruction, Reg};
use crate::memory::{
    Chip8MemoryMap, MemoryMap, CHIP8_ADDR_MASK, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES,
    CHIP8_PROGRAM_ADDR,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// one byte per pixel, 0 or 1, indexed [y][x] from the top-left
pub type Framebuffer = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];

const STACK_DEPTH: usize = 16;
const KEY_COUNT: usize = 16;
const FLAG: Reg = 0xf;

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: [u16; STACK_DEPTH],
    stack_pointer: u8,
    delay_timer: u8,
    sound_timer: u8,
    framebuffer: Framebuffer,
    redraw: bool,
    keys: [bool; KEY_COUNT],
    awaiting_key: Option<Reg>,
    rng: StdRng,
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// reproducible Cxkk, for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            v: [0; 16],
            i: 0x0000,
            program_counter: CHIP8_PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0x00,
            delay_timer: 0x00,
            sound_timer: 0x00,
            framebuffer: [[0; SCREEN_WIDTH]; SCREEN_HEIGHT],
            redraw: false,
            keys: [false; KEY_COUNT],
            awaiting_key: None,
            rng,
        }
    }

    /// back to power-on state; any loaded program is wiped too
    pub fn reset(&mut self) {
        let rng = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0));
        *self = Self::with_rng(rng);
        log::debug!("interpreter reset");
    }

    /// load a chip8 program at 0x200. registers, stack and display are left
    /// alone, call .reset() for those
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.memory.load_program(program)
    }

    /// decrement both timers towards zero. call at 60Hz
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// update the keypad latch
    pub fn set_key(&mut self, key: usize, pressed: bool) {
        match self.keys.get_mut(key) {
            Some(k) => *k = pressed,
            None => log::warn!("ignoring key {:#x}, not a hex key", key),
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// whether the framebuffer changed since the last time we asked
    pub fn take_redraw_flag(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn register(&self, x: Reg) -> u8 {
        self.v[x & 0xf]
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    /// execute one instruction. PC moves past the opcode before it runs, so
    /// after an error the machine sits on the next instruction and the caller
    /// can either give up or carry on
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        if let Some(x) = self.awaiting_key {
            if self.poll_key(x) {
                self.awaiting_key = None;
                self.jump(self.program_counter.wrapping_add(2));
            }
            return Ok(());
        }

        let opcode = self.memory.get_word(self.program_counter);
        self.jump(self.program_counter.wrapping_add(2));
        let instruction = Instruction::decode(opcode)?;
        log::trace!(
            "{:#05x}: {:04x} {:?}",
            self.program_counter.wrapping_sub(2) & CHIP8_ADDR_MASK,
            opcode,
            instruction
        );
        self.execute(instruction)
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), ExecutionError> {
        use Instruction::*;

        match instruction {
            ClearScreen => {
                self.framebuffer = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
                self.redraw = true;
            }
            Return => {
                if self.stack_pointer == 0 {
                    return Err(ExecutionError::StackUnderflow);
                }
                self.stack_pointer -= 1;
                self.jump(self.stack[self.stack_pointer as usize]);
            }
            Jump(nnn) => self.jump(nnn),
            Call(nnn) => {
                if self.stack_pointer as usize >= STACK_DEPTH {
                    return Err(ExecutionError::StackOverflow);
                }
                self.stack[self.stack_pointer as usize] = self.program_counter;
                self.stack_pointer += 1;
                self.jump(nnn);
            }
            SkipEqImm(x, kk) => self.skip_if(self.v[x] == kk),
            SkipNeImm(x, kk) => self.skip_if(self.v[x] != kk),
            SkipEqReg(x, y) => self.skip_if(self.v[x] == self.v[y]),
            SkipNeReg(x, y) => self.skip_if(self.v[x] != self.v[y]),
            LoadImm(x, kk) => self.v[x] = kk,
            AddImm(x, kk) => self.v[x] = self.v[x].wrapping_add(kk),
            Load(x, y) => self.v[x] = self.v[y],
            Or(x, y) => self.v[x] |= self.v[y],
            And(x, y) => self.v[x] &= self.v[y],
            Xor(x, y) => self.v[x] ^= self.v[y],
            Add(x, y) => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.set_with_flag(x, sum, carry);
            }
            Sub(x, y) => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vx.wrapping_sub(vy), vx > vy);
            }
            SubN(x, y) => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vy.wrapping_sub(vx), vy > vx);
            }
            // shifts act on Vx in place; Vy is ignored
            ShiftRight(x, _) => {
                let vx = self.v[x];
                self.set_with_flag(x, vx >> 1, vx & 0x01 == 0x01);
            }
            ShiftLeft(x, _) => {
                let vx = self.v[x];
                self.set_with_flag(x, vx << 1, vx & 0x80 == 0x80);
            }
            SetIndex(nnn) => self.i = nnn,
            JumpOffset(nnn) => self.jump(nnn + self.v[0] as u16),
            Random(x, kk) => self.v[x] = self.rng.gen::<u8>() & kk,
            Draw(x, y, n) => self.draw_sprite(self.v[x] as usize, self.v[y] as usize, n),
            SkipKeyPressed(x) => {
                let pressed = self.key_in(x)?;
                self.skip_if(pressed);
            }
            SkipKeyNotPressed(x) => {
                let pressed = self.key_in(x)?;
                self.skip_if(!pressed);
            }
            GetDelayTimer(x) => self.v[x] = self.delay_timer,
            // PC stays on the Fx0A until a key turns up
            WaitForKey(x) => {
                if !self.poll_key(x) {
                    self.awaiting_key = Some(x);
                    self.jump(self.program_counter.wrapping_sub(2));
                }
            }
            SetDelayTimer(x) => self.delay_timer = self.v[x],
            SetSoundTimer(x) => self.sound_timer = self.v[x],
            AddToIndex(x) => self.i = self.i.wrapping_add(self.v[x] as u16),
            SetIndexToFontChar(x) => {
                self.i = CHIP8_FONT_ADDR + self.v[x] as u16 * CHIP8_FONT_GLYPH_BYTES
            }
            StoreBcd(x) => {
                let vx = self.v[x];
                self.memory.write(&[vx / 100, vx / 10 % 10, vx % 10], self.i);
            }
            // both include Vx itself, so x = 0xf moves all 16 registers
            StoreRegisters(x) => self.memory.write(&self.v[..=x], self.i),
            LoadRegisters(x) => {
                for r in 0..=x {
                    self.v[r] = self.memory.get_byte(self.i.wrapping_add(r as u16));
                }
            }
        }
        Ok(())
    }

    /// PC never leaves the 12-bit address space
    fn jump(&mut self, addr: u16) {
        self.program_counter = addr & CHIP8_ADDR_MASK;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.jump(self.program_counter.wrapping_add(2));
        }
    }

    /// VF is written after the result, so it wins when x is VF
    fn set_with_flag(&mut self, x: Reg, value: u8, flag: bool) {
        self.v[x] = value;
        self.v[FLAG] = flag as u8;
    }

    fn key_in(&self, x: Reg) -> Result<bool, ExecutionError> {
        let key = self.v[x];
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(ExecutionError::InvalidKeyIndex(key))
    }

    /// Vx = lowest key that's down, if any
    fn poll_key(&mut self, x: Reg) -> bool {
        match self.keys.iter().position(|pressed| *pressed) {
            Some(key) => {
                self.v[x] = key as u8;
                true
            }
            None => false,
        }
    }

    /// XOR an n-byte sprite from I onto the display. the origin wraps, the
    /// sprite itself is clipped at the right and bottom edges
    fn draw_sprite(&mut self, x: usize, y: usize, n: u8) {
        let (x0, y0) = (x % SCREEN_WIDTH, y % SCREEN_HEIGHT);
        let mut collision = false;
        for row in 0..n as usize {
            let py = y0 + row;
            if py >= SCREEN_HEIGHT {
                break;
            }
            let sprite = self.memory.get_byte(self.i.wrapping_add(row as u16));
            for col in 0..8 {
                let px = x0 + col;
                if px >= SCREEN_WIDTH {
                    break;
                }
                let bit = (sprite >> (7 - col)) & 1;
                let pixel = &mut self.framebuffer[py][px];
                collision |= bit == 1 && *pixel == 1;
                *pixel ^= bit;
            }
        }
        self.v[FLAG] = collision as u8;
        self.redraw = true;
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
