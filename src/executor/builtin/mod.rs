// src/executor/builtin/mod.rs
mod core;

pub use self::core::{builtin_cd, builtin_echo};
