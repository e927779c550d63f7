pub mod nominal;
pub mod san;

pub use nominal::NominalMove;
pub use san::{play, resolve, to_san, PlayedMove};
