/// # environment
///
/// Wires the interpreter up to its devices and keeps time. Every 1/60s frame:
/// ```text
///  |-- latch the keys pressed since last frame
///  |-- run instructions_per_frame instructions
///  |-- tick the timers once; start/stop the beeper
///  |-- redraw if anything changed
///  `-- sleep until the next frame is due
/// ```
/// so the instruction rate and the 60Hz timers are decoupled, like the real
/// thing where the timers ran off the video interrupt.
use crate::config::{Config, ErrorPolicy, TIMER_HZ};
use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::input::Input;
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use std::time::{Duration, Instant};

const KEY_COUNT: usize = 16;

pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    config: Config,
}

impl<'a> Environment<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: Config,
    ) -> Self {
        Environment {
            interpreter,
            display,
            input,
            sound,
            config,
        }
    }

    /// load a chip8 program into the interpreter
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.interpreter.load(program)?;
        log::info!("program loaded, {} bytes", program.len());
        Ok(())
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    /// run frames until the user quits, the frame limit is hit or the program
    /// fails under ErrorPolicy::Halt. returns the number of frames run
    pub fn main_loop(&mut self) -> Result<u64> {
        log::info!(
            "running at {} instructions/s, {} per frame",
            self.config.instructions_per_second,
            self.config.instructions_per_frame()
        );
        let result = self.run_frames();
        if self.sound.is_beeping() {
            self.sound
                .stop()
                .map_err(|e| Chip8Error::Sound(e.to_string()))?;
        }
        match &result {
            Ok(frames) => log::info!("stopped after {} frames", frames),
            Err(e) => log::error!("halted: {}", e),
        }
        result
    }

    fn run_frames(&mut self) -> Result<u64> {
        let frame = Duration::from_secs(1) / TIMER_HZ;
        let mut frames = 0;
        let mut next_frame = Instant::now();
        while !self.input.quit_requested() && self.config.max_frames.map_or(true, |max| frames < max)
        {
            self.run_frame()?;
            frames += 1;

            next_frame += frame;
            let now = Instant::now();
            if next_frame > now {
                spin_sleep::sleep(next_frame - now);
            } else {
                log::debug!("frame {} overran by {:?}", frames, now - next_frame);
                next_frame = now;
            }
        }
        Ok(frames)
    }

    /// one 60Hz frame's worth of work, without the sleeping
    pub fn run_frame(&mut self) -> Result<()> {
        self.latch_keys()?;

        for _ in 0..self.config.instructions_per_frame() {
            let pc = self.interpreter.program_counter();
            if let Err(source) = self.interpreter.step() {
                match self.config.error_policy {
                    ErrorPolicy::Halt => return Err(Chip8Error::Execution { pc, source }),
                    ErrorPolicy::Skip => log::warn!("skipping {:#05x}: {}", pc, source),
                }
            }
        }

        self.interpreter.tick_timers();
        self.sound
            .follow_timer(self.interpreter.sound_timer())
            .map_err(|e| Chip8Error::Sound(e.to_string()))?;

        if self.interpreter.take_redraw_flag() {
            self.display.draw(self.interpreter.framebuffer())?;
        }
        Ok(())
    }

    /// terminals only tell us about presses, so a key counts as held for the
    /// frame after it was pressed
    fn latch_keys(&mut self) -> Result<()> {
        let mut latch = [false; KEY_COUNT];
        for key in self.input.peek_keys()? {
            match latch.get_mut(*key as usize) {
                Some(k) => *k = true,
                None => log::warn!("input sent non-hex key {:#x}", key),
            }
        }
        self.input.flush_keys()?;
        for (key, pressed) in latch.iter().enumerate() {
            self.interpreter.set_key(key, *pressed);
        }
        Ok(())
    }
}
