pub mod capture;
pub mod keys;
pub mod terminal;
pub mod traits;

pub use capture::{strip_ansi, CaptureSurface};
pub use keys::{decode, KeyInput};
pub use terminal::{KeyReader, TerminalSurface};
pub use traits::Surface;
