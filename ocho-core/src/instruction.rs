/// A decoded view of one 16-bit opcode, valid for a single cycle.
///
/// Chip-8 opcodes pack their operands into fixed nibble positions:
/// - `[_nnn]` a 12-bit address
/// - `[__nn]` an 8-bit immediate
/// - `[___n]` a 4-bit immediate (sprite height for draws)
/// - `[_x__]` the register Vx
/// - `[__y_]` the register Vy
///
/// Decoding is total: every 16-bit value yields an `Instruction`. Whether
/// the executor recognizes it is a separate question.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u16,
    pub nnn: u16,
    pub nn: u8,
    pub n: u8,
    pub x: u8,
    pub y: u8,
}

impl Instruction {
    pub fn decode(opcode: u16) -> Self {
        Instruction {
            opcode,
            nnn: opcode & 0x0FFF,
            nn: (opcode & 0x00FF) as u8,
            n: (opcode & 0x000F) as u8,
            x: ((opcode & 0x0F00) >> 8) as u8,
            y: ((opcode & 0x00F0) >> 4) as u8,
        }
    }

    /// The most significant nibble, which selects the opcode family.
    pub fn family(self) -> u8 {
        (self.opcode >> 12) as u8
    }
}
