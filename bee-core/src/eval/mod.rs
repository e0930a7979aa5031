pub mod error;
pub mod callable;
pub mod native;
pub mod interpreter;

pub mod prelude {
    pub use super::{
        error::*,
        callable::*,
        native::*,
        interpreter::*
    };
}

#[cfg(test)]
mod tests;
