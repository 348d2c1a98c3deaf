pub mod print_output;

pub use print_output::{print_output, render_output};
