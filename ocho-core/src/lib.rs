pub use error::{Fault, LoadError};
pub use instruction::Instruction;
pub use machine::{FrameBuffer, Machine, RunState};

pub mod constants;
mod error;
mod instruction;
mod machine;
mod operations;
mod stack;
