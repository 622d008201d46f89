pub mod ast;
pub mod lower;
pub mod optimize;
pub mod tac;
