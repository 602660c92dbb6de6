mod clan;
mod war;

pub use clan::*;
pub use war::*;
