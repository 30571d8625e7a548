pub mod classify;
pub mod listen;
pub mod replay;
