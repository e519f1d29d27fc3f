use thiserror::Error;

/// Rejected program image. Returned by the loader before any machine state
/// is touched; no partial machine results from a failed load.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("program image is {size} bytes; at most {capacity} fit above the reserved region")]
    RomTooLarge { size: usize, capacity: usize },
}

/// Runtime machine fault raised by a cycle.
///
/// The reference interpreter leaves both of these undefined (unchecked
/// pointer bumps past either end of the stack array). Here they surface as
/// distinguishable errors and the embedder decides whether to halt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Fault {
    /// A `2NNN` call was executed with every stack frame already in use.
    #[error("call stack overflow executing call at {pc:#06X}")]
    StackOverflow { pc: u16 },
    /// A `00EE` return was executed with no saved return address.
    #[error("call stack underflow executing return at {pc:#06X}")]
    StackUnderflow { pc: u16 },
}
