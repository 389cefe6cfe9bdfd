use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use chip8vm::config::{Config, ErrorPolicy, Keymap};
use chip8vm::display::MonoTermDisplay;
use chip8vm::error::Result;
use chip8vm::environment::Environment;
use chip8vm::input::TermInput;
use chip8vm::interpreter::Chip8Interpreter;
use chip8vm::rom::read_rom;
use chip8vm::sound::{Mute, SimpleBeep, Sound};

/// Run a CHIP-8 ROM in the terminal. Esc quits.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// path to the ROM image
    rom: PathBuf,

    /// instructions per second
    #[arg(short, long, default_value_t = 700)]
    speed: u32,

    /// how keyboard keys map onto the hex keypad
    #[arg(short, long, value_enum, default_value_t = Keymap::Conventional)]
    keymap: Keymap,

    /// what to do when the program hits a bad instruction
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Halt)]
    on_error: ErrorPolicy,

    /// don't beep
    #[arg(short, long)]
    mute: bool,

    /// stop after this many 60Hz frames
    #[arg(long)]
    frames: Option<u64>,
}

fn main() {
    let args = Args::parse();
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("chip8vm: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config {
        instructions_per_second: args.speed,
        keymap: args.keymap,
        error_policy: args.on_error,
        mute: args.mute,
        max_frames: args.frames,
    };

    // read the ROM before touching the terminal, so failures print cleanly
    let rom = read_rom(&args.rom)?;

    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new(config.keymap)?;
    let mut beeper = SimpleBeep::new();
    let mut mute = Mute::new();
    let sound: &mut dyn Sound = if config.mute { &mut mute } else { &mut beeper };

    let mut env = Environment::new(
        Chip8Interpreter::new(),
        &mut display,
        &mut input,
        sound,
        config,
    );
    env.load_program(&rom)?;
    let result = env.main_loop();
    drop(env);
    // put raw mode back before anything gets printed
    drop(input);

    // shove some junk on stdout to stop the cli messing up the last frame
    println!();
    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8vm::error::{Chip8Error, LoadError};
    use std::ffi::OsStr;
    use std::fs;

    #[test]
    fn test_missing_rom_reports_readable_error() {
        let args = Args::parse_from(["chip8vm", "/nonexistent/dir/pong.ch8"]);
        let err = run(args).unwrap_err();
        assert!(matches!(err, Chip8Error::Io(_)));
        let message = err.to_string();
        assert!(message.starts_with("io error: "), "{}", message);
        assert!(!message.contains("Os {"), "{}", message);
    }

    #[test]
    fn test_oversized_rom_reports_readable_error() {
        let path = std::env::temp_dir().join(format!("chip8vm-big-{}.ch8", std::process::id()));
        fs::write(&path, vec![0u8; 4000]).unwrap();
        let args = Args::parse_from([OsStr::new("chip8vm"), path.as_os_str()]);
        let err = run(args).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            Chip8Error::Load(LoadError::RomTooLarge { size: 4000, .. })
        ));
        assert!(err.to_string().starts_with("load error: "));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["chip8vm", "game.ch8"]);
        assert_eq!(args.speed, 700);
        assert_eq!(args.keymap, Keymap::Conventional);
        assert_eq!(args.on_error, ErrorPolicy::Halt);
        assert!(!args.mute);
        assert_eq!(args.frames, None);
    }
}
