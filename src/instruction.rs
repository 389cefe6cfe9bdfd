/// # instruction set
///
/// Every CHIP-8 instruction is two bytes, big-endian, split into nibbles:
///
/// ```text
///  c x y n
///  | | | `-- n:   low nibble (sprite height, sub-selector)
///  | | `---- y:   register Vy
///  | `------ x:   register Vx
///  `-------- c:   instruction family
/// ```
///
///  kk  = low byte (immediate value, sub-selector)
///  nnn = low 12 bits (address)
///
/// decoding is pure; the interpreter executes the result
use crate::error::ExecutionError;

/// register index, always 0x0..=0xf
pub type Reg = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SkipEqImm(Reg, u8),
    /// 4xkk
    SkipNeImm(Reg, u8),
    /// 5xy0
    SkipEqReg(Reg, Reg),
    /// 6xkk
    LoadImm(Reg, u8),
    /// 7xkk
    AddImm(Reg, u8),
    /// 8xy0
    Load(Reg, Reg),
    /// 8xy1
    Or(Reg, Reg),
    /// 8xy2
    And(Reg, Reg),
    /// 8xy3
    Xor(Reg, Reg),
    /// 8xy4
    Add(Reg, Reg),
    /// 8xy5
    Sub(Reg, Reg),
    /// 8xy6
    ShiftRight(Reg, Reg),
    /// 8xy7
    SubN(Reg, Reg),
    /// 8xyE
    ShiftLeft(Reg, Reg),
    /// 9xy0
    SkipNeReg(Reg, Reg),
    /// Annn
    SetIndex(u16),
    /// Bnnn
    JumpOffset(u16),
    /// Cxkk
    Random(Reg, u8),
    /// Dxyn
    Draw(Reg, Reg, u8),
    /// Ex9E
    SkipKeyPressed(Reg),
    /// ExA1
    SkipKeyNotPressed(Reg),
    /// Fx07
    GetDelayTimer(Reg),
    /// Fx0A
    WaitForKey(Reg),
    /// Fx15
    SetDelayTimer(Reg),
    /// Fx18
    SetSoundTimer(Reg),
    /// Fx1E
    AddToIndex(Reg),
    /// Fx29
    SetIndexToFontChar(Reg),
    /// Fx33
    StoreBcd(Reg),
    /// Fx55
    StoreRegisters(Reg),
    /// Fx65
    LoadRegisters(Reg),
}

impl Instruction {
    /// decode a raw opcode. 0nnn (call machine code routine) is deliberately
    /// not supported, there's no RCA 1802 underneath us
    pub fn decode(opcode: u16) -> Result<Instruction, ExecutionError> {
        use Instruction::*;

        let x = ((opcode & 0x0f00) >> 8) as Reg;
        let y = ((opcode & 0x00f0) >> 4) as Reg;
        let n = (opcode & 0x000f) as u8;
        let kk = (opcode & 0x00ff) as u8;
        let nnn = opcode & 0x0fff;

        let instruction = match (opcode >> 12, n) {
            (0x0, _) => match opcode {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => return Err(ExecutionError::UnknownOpcode(opcode)),
            },
            (0x1, _) => Jump(nnn),
            (0x2, _) => Call(nnn),
            (0x3, _) => SkipEqImm(x, kk),
            (0x4, _) => SkipNeImm(x, kk),
            (0x5, 0x0) => SkipEqReg(x, y),
            (0x6, _) => LoadImm(x, kk),
            (0x7, _) => AddImm(x, kk),
            (0x8, 0x0) => Load(x, y),
            (0x8, 0x1) => Or(x, y),
            (0x8, 0x2) => And(x, y),
            (0x8, 0x3) => Xor(x, y),
            (0x8, 0x4) => Add(x, y),
            (0x8, 0x5) => Sub(x, y),
            (0x8, 0x6) => ShiftRight(x, y),
            (0x8, 0x7) => SubN(x, y),
            (0x8, 0xe) => ShiftLeft(x, y),
            (0x9, 0x0) => SkipNeReg(x, y),
            (0xa, _) => SetIndex(nnn),
            (0xb, _) => JumpOffset(nnn),
            (0xc, _) => Random(x, kk),
            (0xd, _) => Draw(x, y, n),
            (0xe, _) => match kk {
                0x9e => SkipKeyPressed(x),
                0xa1 => SkipKeyNotPressed(x),
                _ => return Err(ExecutionError::UnknownOpcode(opcode)),
            },
            (0xf, _) => match kk {
                0x07 => GetDelayTimer(x),
                0x0a => WaitForKey(x),
                0x15 => SetDelayTimer(x),
                0x18 => SetSoundTimer(x),
                0x1e => AddToIndex(x),
                0x29 => SetIndexToFontChar(x),
                0x33 => StoreBcd(x),
                0x55 => StoreRegisters(x),
                0x65 => LoadRegisters(x),
                _ => return Err(ExecutionError::UnknownOpcode(opcode)),
            },
            _ => return Err(ExecutionError::UnknownOpcode(opcode)),
        };
        Ok(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_decode_system() {
        assert_eq!(Instruction::decode(0x00e0), Ok(ClearScreen));
        assert_eq!(Instruction::decode(0x00ee), Ok(Return));
    }

    #[test]
    fn test_decode_machine_call_unsupported() {
        assert_eq!(
            Instruction::decode(0x0123),
            Err(ExecutionError::UnknownOpcode(0x0123))
        );
        assert_eq!(
            Instruction::decode(0x0000),
            Err(ExecutionError::UnknownOpcode(0x0000))
        );
    }

    #[test]
    fn test_decode_fields() {
        assert_eq!(Instruction::decode(0x1abc), Ok(Jump(0xabc)));
        assert_eq!(Instruction::decode(0x2def), Ok(Call(0xdef)));
        assert_eq!(Instruction::decode(0x3a42), Ok(SkipEqImm(0xa, 0x42)));
        assert_eq!(Instruction::decode(0x4b42), Ok(SkipNeImm(0xb, 0x42)));
        assert_eq!(Instruction::decode(0x5120), Ok(SkipEqReg(1, 2)));
        assert_eq!(Instruction::decode(0x6fff), Ok(LoadImm(0xf, 0xff)));
        assert_eq!(Instruction::decode(0x7001), Ok(AddImm(0, 1)));
        assert_eq!(Instruction::decode(0x9340), Ok(SkipNeReg(3, 4)));
        assert_eq!(Instruction::decode(0xa123), Ok(SetIndex(0x123)));
        assert_eq!(Instruction::decode(0xb300), Ok(JumpOffset(0x300)));
        assert_eq!(Instruction::decode(0xc50f), Ok(Random(5, 0x0f)));
        assert_eq!(Instruction::decode(0xd125), Ok(Draw(1, 2, 5)));
    }

    #[test]
    fn test_decode_register_ops() {
        assert_eq!(Instruction::decode(0x8ab0), Ok(Load(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8ab1), Ok(Or(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8ab2), Ok(And(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8ab3), Ok(Xor(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8ab4), Ok(Add(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8ab5), Ok(Sub(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8ab6), Ok(ShiftRight(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8ab7), Ok(SubN(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x8abe), Ok(ShiftLeft(0xa, 0xb)));
        for bad in [0x8ab8, 0x8ab9, 0x8aba, 0x8abb, 0x8abc, 0x8abd, 0x8abf] {
            assert_eq!(
                Instruction::decode(bad),
                Err(ExecutionError::UnknownOpcode(bad))
            );
        }
    }

    #[test]
    fn test_decode_register_skips_need_zero_nibble() {
        assert_eq!(
            Instruction::decode(0x5121),
            Err(ExecutionError::UnknownOpcode(0x5121))
        );
        assert_eq!(
            Instruction::decode(0x912f),
            Err(ExecutionError::UnknownOpcode(0x912f))
        );
    }

    #[test]
    fn test_decode_keys_and_misc() {
        assert_eq!(Instruction::decode(0xe39e), Ok(SkipKeyPressed(3)));
        assert_eq!(Instruction::decode(0xe3a1), Ok(SkipKeyNotPressed(3)));
        assert_eq!(Instruction::decode(0xf207), Ok(GetDelayTimer(2)));
        assert_eq!(Instruction::decode(0xf20a), Ok(WaitForKey(2)));
        assert_eq!(Instruction::decode(0xf215), Ok(SetDelayTimer(2)));
        assert_eq!(Instruction::decode(0xf218), Ok(SetSoundTimer(2)));
        assert_eq!(Instruction::decode(0xf21e), Ok(AddToIndex(2)));
        assert_eq!(Instruction::decode(0xf229), Ok(SetIndexToFontChar(2)));
        assert_eq!(Instruction::decode(0xf233), Ok(StoreBcd(2)));
        assert_eq!(Instruction::decode(0xff55), Ok(StoreRegisters(0xf)));
        assert_eq!(Instruction::decode(0xff65), Ok(LoadRegisters(0xf)));
        for bad in [0xe39f, 0xe300, 0xf200, 0xf230, 0xf275, 0xf285] {
            assert_eq!(
                Instruction::decode(bad),
                Err(ExecutionError::UnknownOpcode(bad))
            );
        }
    }
}
