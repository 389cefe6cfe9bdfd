use beep::beep;
use std::error::Error;

/// something that can make the CHIP-8 buzzer noise
pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
    fn is_beeping(&self) -> bool;

    /// follow the sound timer: buzz while it's non-zero, only touching the
    /// device when that changes
    fn follow_timer(&mut self, sound_timer: u8) -> Result<(), Box<dyn Error>> {
        match (sound_timer > 0, self.is_beeping()) {
            (true, false) => self.beep(),
            (false, true) => self.stop(),
            _ => Ok(()),
        }
    }
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker style beep through the `beep` crate
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        beep(SIMPLEBEEP_PITCH)?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        beep(0)?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

/// silence, keeps track of when it would have beeped
#[derive(Default)]
pub struct Mute {
    is_beeping: bool,
    pub beeps: usize,
}

impl Mute {
    pub fn new() -> Self {
        Mute::default()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        self.is_beeping = true;
        self.beeps += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_timer_toggles_once() -> Result<(), Box<dyn Error>> {
        let mut s = Mute::new();
        s.follow_timer(0)?;
        assert!(!s.is_beeping());
        s.follow_timer(3)?;
        s.follow_timer(2)?;
        s.follow_timer(1)?;
        assert!(s.is_beeping());
        assert_eq!(s.beeps, 1);
        s.follow_timer(0)?;
        assert!(!s.is_beeping());
        s.follow_timer(5)?;
        assert_eq!(s.beeps, 2);
        Ok(())
    }
}
