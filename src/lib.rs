//! # chip8vm
//!
//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the interpreter is the whole machine state and nothing else: memory,
//!   registers, stack, timers, framebuffer and keypad latch. it knows nothing
//!   about terminals, clocks or files
//! * decoding is a pure function from opcode to `Instruction`; executing is an
//!   exhaustive match on that
//! * misbehaving programs produce errors, never panics; every address derived
//!   from I or PC is masked to 12 bits
//! * instructions run as fast as configured, timers tick at 60Hz regardless;
//!   the environment does the pacing, sleeping between frames
//! * display, input and sound sit behind traits so alternatives can be
//!   plugged in; the defaults are TUI in-console, crossterm and `beep`
//!
//! Model
//!
//! ```text
//! Environment
//!  |-- display, input, sound, config
//!  |-- interpreter
//!  |    |-- memory (font at 0x000, program at 0x200)
//!  |    `-- instruction set
//!  `-- main loop
//!       |-- latch keys
//!       |-- interpreter.step() x instructions_per_frame
//!       |-- interpreter.tick_timers(); sound.follow_timer()
//!       |-- if interpreter.take_redraw_flag() { display.draw() }
//!       `-- sleep until next frame
//! ```
//!
//! ```
//! use chip8vm::interpreter::Chip8Interpreter;
//!
//! let mut vm = Chip8Interpreter::new();
//! vm.load(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]).unwrap();
//! for _ in 0..3 {
//!     vm.step().unwrap();
//! }
//! assert_eq!(vm.register(0), 8);
//! ```
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod rom;
pub mod sound;
