#![crate_name = "zengine"]
#![allow(dead_code)]

#[macro_use]
extern crate lazy_static;

pub mod ast;
pub mod bytestream;
pub mod config;
pub mod diagnostic;
pub mod driver;
pub mod instruction_encoder;
pub mod lexer;
pub mod macros;
pub mod memory_layout;
pub mod opcodes;
pub mod parser;
pub mod source_location;
pub mod symbol_table;
pub mod vm_memory;
pub mod zvalue;

pub use driver::{CompilationSession, CompileFailure};
