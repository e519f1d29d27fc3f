use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::machine::Machine;

impl Machine {
    /// Apply one decoded instruction to the machine.
    ///
    /// Dispatch is on the opcode's top nibble, with the `0x0` family
    /// further discriminated on its low byte. Anything unmatched is a
    /// deliberate no-op: the pc was already advanced by the fetch, so the
    /// cycle completes with no further effect. A program written for the
    /// full instruction set runs degraded instead of crashing.
    pub(crate) fn execute(&mut self, inst: Instruction) -> Result<(), Fault> {
        match inst.family() {
            0x0 => match inst.nn {
                0xE0 => self.clear(),
                0xEE => self.ret()?,
                _ => {}
            },
            0x1 => self.jump(inst),
            0x2 => self.call(inst)?,
            0x6 => self.load(inst),
            0x7 => self.add(inst),
            0xA => self.load_index(inst),
            0xD => self.draw(inst),
            _ => {}
        }
        Ok(())
    }

    /// `00E0`: every display cell off.
    fn clear(&mut self) {
        self.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// `00EE`: pop the saved return address into the pc.
    fn ret(&mut self) -> Result<(), Fault> {
        match self.stack.pop() {
            Some(addr) => {
                self.pc = addr;
                Ok(())
            }
            None => Err(Fault::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            }),
        }
    }

    /// `1NNN`: pc = nnn, exactly; no increment follows a jump.
    fn jump(&mut self, inst: Instruction) {
        self.pc = inst.nnn;
    }

    /// `2NNN`: save the (already advanced) pc, then jump to nnn.
    fn call(&mut self, inst: Instruction) -> Result<(), Fault> {
        if !self.stack.push(self.pc) {
            return Err(Fault::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.pc = inst.nnn;
        Ok(())
    }

    /// `6XNN`: Vx = nn.
    fn load(&mut self, inst: Instruction) {
        self.v[usize::from(inst.x)] = inst.nn;
    }

    /// `7XNN`: Vx += nn with 8-bit wraparound. Does not touch VF.
    fn add(&mut self, inst: Instruction) {
        let x = usize::from(inst.x);
        self.v[x] = self.v[x].wrapping_add(inst.nn);
    }

    /// `ANNN`: I = nnn.
    fn load_index(&mut self, inst: Instruction) {
        self.i = inst.nnn;
    }

    /// `DXYN`: XOR an n-row sprite from memory at I onto the display at
    /// (Vx, Vy); VF = 1 if any lit cell was toggled off.
    ///
    /// The start position wraps onto the display, but the sprite itself is
    /// clipped at the right and bottom edges once drawing begins. Bytes are
    /// drawn most significant bit leftmost; a clear sprite bit leaves the
    /// cell alone, which is what makes redrawing a sprite erase it.
    fn draw(&mut self, inst: Instruction) {
        let start_col = usize::from(self.v[usize::from(inst.x)]) % DISPLAY_WIDTH;
        let start_row = usize::from(self.v[usize::from(inst.y)]) % DISPLAY_HEIGHT;

        self.v[0xF] = 0;
        for row in 0..usize::from(inst.n) {
            let y = start_row + row;
            if y >= DISPLAY_HEIGHT {
                break;
            }
            let sprite_row = self.read(self.i.wrapping_add(row as u16));
            for bit in 0..8 {
                let x = start_col + bit;
                if x >= DISPLAY_WIDTH {
                    break;
                }
                let sprite_bit = (sprite_row >> (7 - bit)) & 1 == 1;
                let cell = &mut self.frame_buffer[y][x];
                if sprite_bit && *cell {
                    self.v[0xF] = 1;
                }
                *cell ^= sprite_bit;
            }
        }
    }
}

#[cfg(test)]
mod test_operations {
    use super::*;
    use crate::constants::PROGRAM_START;

    /// A machine with its pc already advanced past the opcode under test,
    /// the way `cycle` leaves it before calling `execute`.
    fn machine() -> Machine {
        let mut machine = Machine::new();
        machine.pc = PROGRAM_START + 2;
        machine
    }

    fn exec(machine: &mut Machine, opcode: u16) -> Result<(), Fault> {
        machine.execute(Instruction::decode(opcode))
    }

    #[test]
    fn test_00e0_clears_display() {
        let mut machine = machine();
        machine.frame_buffer[0][0] = true;
        machine.frame_buffer[31][63] = true;
        exec(&mut machine, 0x00E0).unwrap();
        assert!(machine.frame_buffer.iter().flatten().all(|&cell| !cell));
    }

    #[test]
    fn test_00ee_pops_into_pc() {
        let mut machine = machine();
        assert!(machine.stack.push(0x0ABC));
        exec(&mut machine, 0x00EE).unwrap();
        assert_eq!(machine.pc, 0x0ABC);
        assert_eq!(machine.stack.depth(), 0);
    }

    #[test]
    fn test_00ee_empty_stack_faults() {
        let mut machine = machine();
        assert_eq!(
            exec(&mut machine, 0x00EE),
            Err(Fault::StackUnderflow { pc: PROGRAM_START })
        );
    }

    #[test]
    fn test_1nnn_jumps_exactly() {
        let mut machine = machine();
        exec(&mut machine, 0x1ABC).unwrap();
        assert_eq!(machine.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_pushes_and_jumps() {
        let mut machine = machine();
        exec(&mut machine, 0x2123).unwrap();
        assert_eq!(machine.pc, 0x0123);
        assert_eq!(machine.stack.pop(), Some(PROGRAM_START + 2));
    }

    #[test]
    fn test_2nnn_full_stack_faults() {
        let mut machine = machine();
        for _ in 0..12 {
            exec(&mut machine, 0x2400).unwrap();
        }
        assert_eq!(
            exec(&mut machine, 0x2400),
            Err(Fault::StackOverflow { pc: 0x0400 - 2 })
        );
    }

    #[test]
    fn test_call_then_return_resumes_after_call() {
        // Run real cycles so the fetch/advance ordering is part of the test:
        // a call at p followed by a return must land at p + 2.
        let mut machine = Machine::new();
        machine.load_rom(&[0x22, 0x04, 0x00, 0x00, 0x00, 0xEE]).unwrap();
        machine.cycle().unwrap();
        assert_eq!(machine.pc, 0x0204);
        machine.cycle().unwrap();
        assert_eq!(machine.pc, PROGRAM_START + 2);
    }

    #[test]
    fn test_6xnn_loads_immediate() {
        let mut machine = machine();
        exec(&mut machine, 0x6122).unwrap();
        assert_eq!(machine.v[0x1], 0x22);
    }

    #[test]
    fn test_7xnn_adds_immediate() {
        let mut machine = machine();
        machine.v[0x1] = 0x1;
        exec(&mut machine, 0x7122).unwrap();
        assert_eq!(machine.v[0x1], 0x23);
    }

    #[test]
    fn test_7xnn_wraps_without_touching_vf() {
        let mut machine = machine();
        machine.v[0x1] = 250;
        machine.v[0xF] = 0xAB;
        exec(&mut machine, 0x710A).unwrap();
        // 260 % 256
        assert_eq!(machine.v[0x1], 4);
        assert_eq!(machine.v[0xF], 0xAB);
    }

    #[test]
    fn test_annn_loads_index() {
        let mut machine = machine();
        exec(&mut machine, 0xAABC).unwrap();
        assert_eq!(machine.i, 0x0ABC);
    }

    #[test]
    fn test_dxyn_draws_font_glyph() {
        let mut machine = machine();
        // Draw the 0 glyph (5 rows at address 0) offset one cell right and down.
        machine.v[0x0] = 0x1;
        machine.v[0x1] = 0x1;
        exec(&mut machine, 0xD015).unwrap();
        let mut expected = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[true, true, true, true]);
        expected[2][1..5].copy_from_slice(&[true, false, false, true]);
        expected[3][1..5].copy_from_slice(&[true, false, false, true]);
        expected[4][1..5].copy_from_slice(&[true, false, false, true]);
        expected[5][1..5].copy_from_slice(&[true, true, true, true]);
        assert_eq!(machine.frame_buffer, expected);
        assert_eq!(machine.v[0xF], 0x0);
    }

    #[test]
    fn test_dxyn_sets_collision_flag() {
        let mut machine = machine();
        machine.i = 0x300;
        machine.memory[0x300] = 0x80;
        machine.frame_buffer[0][0] = true;
        exec(&mut machine, 0xD011).unwrap();
        assert_eq!(machine.v[0xF], 0x1);
        assert!(!machine.frame_buffer[0][0]);
    }

    #[test]
    fn test_dxyn_no_collision_onto_dark_cell() {
        let mut machine = machine();
        machine.i = 0x300;
        machine.memory[0x300] = 0x80;
        exec(&mut machine, 0xD011).unwrap();
        assert_eq!(machine.v[0xF], 0x0);
        assert!(machine.frame_buffer[0][0]);
    }

    #[test]
    fn test_dxyn_double_draw_restores_display() {
        let mut machine = machine();
        machine.i = 0x300;
        machine.memory[0x300..0x302].copy_from_slice(&[0xA5, 0x5A]);
        machine.frame_buffer[0][0] = true;
        machine.frame_buffer[1][3] = true;
        let before = machine.frame_buffer;
        exec(&mut machine, 0xD012).unwrap();
        exec(&mut machine, 0xD012).unwrap();
        assert_eq!(machine.frame_buffer, before);
    }

    #[test]
    fn test_dxyn_clips_at_right_edge() {
        let mut machine = machine();
        machine.i = 0x300;
        machine.memory[0x300] = 0xFF;
        machine.v[0x0] = 60;
        exec(&mut machine, 0xD011).unwrap();
        assert_eq!(machine.frame_buffer[0][60..], [true; 4]);
        // No wraparound onto the left edge.
        assert!(!machine.frame_buffer[0][0]);
    }

    #[test]
    fn test_dxyn_clips_at_bottom_edge() {
        let mut machine = machine();
        machine.i = 0x300;
        machine.memory[0x300..0x303].copy_from_slice(&[0x80, 0x80, 0x80]);
        machine.v[0x1] = 30;
        exec(&mut machine, 0xD013).unwrap();
        assert!(machine.frame_buffer[30][0]);
        assert!(machine.frame_buffer[31][0]);
        // The third row fell off the bottom rather than wrapping to row 0.
        assert!(!machine.frame_buffer[0][0]);
    }

    #[test]
    fn test_dxyn_wraps_start_coordinates() {
        let mut machine = machine();
        machine.i = 0x300;
        machine.memory[0x300] = 0x80;
        machine.v[0x0] = 64; // column 64 % 64 = 0
        machine.v[0x1] = 33; // row 33 % 32 = 1
        exec(&mut machine, 0xD011).unwrap();
        assert!(machine.frame_buffer[1][0]);
    }

    #[test]
    fn test_unrecognized_opcodes_change_nothing() {
        // A skip, an arithmetic op, a rand, and a keypad query from the
        // full instruction set; all outside the implemented subset.
        for &opcode in &[0x3123u16, 0x8124, 0xC1FF, 0xE19E, 0xFFFF, 0x0123] {
            let mut machine = machine();
            machine.v[0x1] = 0x11;
            exec(&mut machine, opcode).unwrap();
            assert_eq!(machine.pc, PROGRAM_START + 2, "opcode {opcode:04X}");
            assert_eq!(machine.v[0x1], 0x11);
            assert_eq!(machine.stack.depth(), 0);
            assert!(machine.frame_buffer.iter().flatten().all(|&cell| !cell));
        }
    }
}
