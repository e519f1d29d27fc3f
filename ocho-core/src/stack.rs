use crate::constants::STACK_DEPTH;

/// Bounded stack of subroutine return addresses.
///
/// Capacity is fixed at [`STACK_DEPTH`] frames. Unlike the reference
/// interpreter, which bumps a raw pointer past either end of its backing
/// array, both `push` and `pop` report when the bound is hit and leave the
/// stack untouched.
#[derive(Copy, Clone, Debug)]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    depth: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: [0; STACK_DEPTH],
            depth: 0,
        }
    }

    /// Push a return address; `false` if every frame is already in use.
    #[must_use]
    pub fn push(&mut self, addr: u16) -> bool {
        if self.depth == STACK_DEPTH {
            return false;
        }
        self.frames[self.depth] = addr;
        self.depth += 1;
        true
    }

    /// Pop the most recently pushed return address, if any.
    pub fn pop(&mut self) -> Option<u16> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        Some(self.frames[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
