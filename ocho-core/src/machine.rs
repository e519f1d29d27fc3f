use log::{debug, trace};

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_SPRITES, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START,
};
use crate::error::{Fault, LoadError};
use crate::instruction::Instruction;
use crate::stack::CallStack;

/// The display buffer is indexed as `[row][col]`.
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Whether the machine should currently be cycled.
///
/// The core only ever reads this; transitions are commanded by the
/// embedding frontend (quit and pause events). There is no transition out
/// of `Halted`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Halted,
}

impl RunState {
    /// The pause-key transition: `Running` <-> `Paused`, `Halted` is terminal.
    pub fn toggled(self) -> Self {
        match self {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Halted => RunState::Halted,
        }
    }
}

/// # Machine
/// One Chip-8 machine instance: memory, registers, call stack, display
/// buffer, and run state, owned as a single aggregate with no statics.
///
/// Supplies interfaces for:
/// - loading a program image
/// - executing exactly one fetch/decode/execute cycle
/// - inspecting the frame buffer for rendering by some display
/// - reading and writing the run state
/// - the (currently unread) hex keypad
pub struct Machine {
    pub(crate) memory: [u8; MEMORY_SIZE],
    /// General purpose registers V0-VF; VF doubles as the draw collision flag.
    pub(crate) v: [u8; 16],
    /// Index register; only the low 12 bits address memory.
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) stack: CallStack,
    pub(crate) frame_buffer: FrameBuffer,
    /// Pressed state of the hex keypad. No opcode in the implemented subset
    /// reads it; the input frontend still reports into it.
    pub(crate) keypad: [bool; 16],
    run_state: RunState,
}

impl Machine {
    pub fn new() -> Self {
        // 0x000..0x050 holds the font; programs load at PROGRAM_START.
        let mut memory = [0; MEMORY_SIZE];
        memory[..FONT_SPRITES.len()].copy_from_slice(&FONT_SPRITES);

        Machine {
            memory,
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: CallStack::new(),
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            keypad: [false; 16],
            run_state: RunState::Running,
        }
    }

    /// Copy a program image to `PROGRAM_START` and point the pc at it.
    ///
    /// An image larger than the memory above the reserved region is
    /// rejected before anything is written.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::RomTooLarge {
                size: rom.len(),
                capacity: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        self.pc = PROGRAM_START;
        debug!("loaded {} byte program at {:#06X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Run exactly one cycle: fetch the opcode at the pc, advance the pc
    /// past it, decode, execute.
    ///
    /// The pc is advanced before execution, so a jump or call lands exactly
    /// on its target and a call pushes the address of the following
    /// instruction.
    pub fn cycle(&mut self) -> Result<(), Fault> {
        let opcode = self.fetch();
        self.pc = self.pc.wrapping_add(2);
        trace!(
            "{:04X}: {:04X} v{:02X?} i{:04X}",
            self.pc.wrapping_sub(2),
            opcode,
            self.v,
            self.i
        );
        self.execute(Instruction::decode(opcode))
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }

    /// Record a keypad key (0x0-0xF) as pressed.
    pub fn key_press(&mut self, key: u8) {
        self.keypad[usize::from(key & 0xF)] = true;
    }

    /// Record a keypad key (0x0-0xF) as released.
    pub fn key_release(&mut self, key: u8) {
        self.keypad[usize::from(key & 0xF)] = false;
    }

    /// Pressed state of the hex keypad, 0x0-0xF.
    pub fn keypad(&self) -> &[bool; 16] {
        &self.keypad
    }

    /// Combine the two bytes at the pc into one big-endian opcode.
    fn fetch(&self) -> u16 {
        let hi = u16::from(self.read(self.pc));
        let lo = u16::from(self.read(self.pc.wrapping_add(1)));
        hi << 8 | lo
    }

    /// Read one byte; addresses fold into the 4K space.
    pub(crate) fn read(&self, addr: u16) -> u8 {
        self.memory[usize::from(addr) % MEMORY_SIZE]
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
