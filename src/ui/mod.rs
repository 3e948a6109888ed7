pub mod icons;
pub mod terminal;

pub use terminal::{TerminalPresenter, print_field_errors, spinner};
