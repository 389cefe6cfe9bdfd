use crate::config::Keymap;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// map of characters read from the keyboard to what the chip8 might expect
/// where '1' => 0x01 and 'a' => 0x0a
const CHIP8_LITERAL_KEYMAP: [(char, u8); 16] = [
    ('0', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x04),
    ('5', 0x05),
    ('6', 0x06),
    ('7', 0x07),
    ('8', 0x08),
    ('9', 0x09),
    ('a', 0x0a),
    ('b', 0x0b),
    ('c', 0x0c),
    ('d', 0x0d),
    ('e', 0x0e),
    ('f', 0x0f),
];

/// ditto using left-hand side of qwerty keyboard, laid out like the COSMAC
/// keypad:
///  1 2 3 C      1 2 3 4
///  4 5 6 D  <=  q w e r
///  7 8 9 E      a s d f
///  A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

fn keymap_table(keymap: Keymap) -> HashMap<char, u8> {
    match keymap {
        Keymap::Conventional => HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        Keymap::Literal => HashMap::from(CHIP8_LITERAL_KEYMAP),
    }
}

/// reads keypresses
pub trait Input {
    /// get a list of all the mapped keys that have been pressed recently,
    /// without flushing them from the buffer
    fn peek_keys(&mut self) -> Result<&[u8], io::Error>;

    /// flush all the keypresses from the buffer
    fn flush_keys(&mut self) -> Result<(), io::Error>;

    /// the user asked to leave the emulator
    fn quit_requested(&self) -> bool;
}

/// terminal keyboard, read through crossterm in raw mode
pub struct TermInput {
    buffer: Vec<u8>,
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl TermInput {
    pub fn new(keymap: Keymap) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            buffer: Vec::new(),
            keymap: keymap_table(keymap),
            quit: false,
        })
    }

    fn read_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    // raw mode swallows SIGINT
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char(key) => self.map_key(key.to_ascii_lowercase()),
                    KeyCode::Esc => self.quit = true,
                    _ => log::debug!("ignoring key event {:?}", evt),
                },
                other => log::debug!("ignoring event {:?}", other),
            }
        }
        Ok(())
    }

    fn map_key(&mut self, key: char) {
        match self.keymap.get(&key) {
            Some(mapped_key) => self.buffer.push(*mapped_key),
            None => log::warn!("can't map {:?} to a COSMAC key", key),
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("couldn't restore terminal: {}", e);
        }
    }
}

impl Input for TermInput {
    fn peek_keys(&mut self) -> Result<&[u8], io::Error> {
        self.read_events()?;
        Ok(self.buffer.as_slice())
    }

    fn flush_keys(&mut self) -> Result<(), io::Error> {
        self.read_events()?;
        self.buffer.clear();
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing; each batch of keys is reported
/// for one peek/flush cycle, then the next batch takes over
pub struct DummyInput {
    batches: Vec<Vec<u8>>,
    quit_when_empty: bool,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        Self::with_batches(&[keys])
    }

    pub fn with_batches(batches: &[&[u8]]) -> Self {
        DummyInput {
            batches: batches.iter().rev().map(|b| b.to_vec()).collect(),
            quit_when_empty: false,
        }
    }

    /// ask to quit once every batch has been flushed
    pub fn quit_when_empty(mut self) -> Self {
        self.quit_when_empty = true;
        self
    }
}

impl Input for DummyInput {
    fn peek_keys(&mut self) -> Result<&[u8], io::Error> {
        Ok(self.batches.last().map(Vec::as_slice).unwrap_or(&[]))
    }

    fn flush_keys(&mut self) -> Result<(), io::Error> {
        self.batches.pop();
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit_when_empty && self.batches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymaps_cover_every_key() {
        for keymap in [Keymap::Conventional, Keymap::Literal] {
            let table = keymap_table(keymap);
            let mut keys: Vec<u8> = table.values().copied().collect();
            keys.sort();
            assert_eq!(keys, (0x0..=0xf).collect::<Vec<u8>>());
        }
    }

    #[test]
    fn test_conventional_keymap_layout() {
        let table = keymap_table(Keymap::Conventional);
        assert_eq!(table[&'1'], 0x1);
        assert_eq!(table[&'4'], 0xc);
        assert_eq!(table[&'x'], 0x0);
        assert_eq!(table[&'v'], 0xf);
    }

    #[test]
    fn test_literal_keymap() {
        let table = keymap_table(Keymap::Literal);
        assert_eq!(table[&'0'], 0x0);
        assert_eq!(table[&'a'], 0xa);
        assert_eq!(table.get(&'g'), None);
    }

    #[test]
    fn test_dummy_input_batches() -> Result<(), io::Error> {
        let mut input = DummyInput::with_batches(&[&[1, 2], &[], &[0xf]]).quit_when_empty();
        assert_eq!(input.peek_keys()?, &[1, 2]);
        assert_eq!(input.peek_keys()?, &[1, 2]);
        input.flush_keys()?;
        assert_eq!(input.peek_keys()?, &[] as &[u8]);
        input.flush_keys()?;
        assert_eq!(input.peek_keys()?, &[0xf]);
        assert!(!input.quit_requested());
        input.flush_keys()?;
        assert!(input.quit_requested());
        assert_eq!(input.peek_keys()?, &[] as &[u8]);
        Ok(())
    }
}
