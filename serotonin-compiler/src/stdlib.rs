use include_dir::{include_dir, Dir};

/// The libraries baked into the compiler. `IMPORT std;` resolves here
/// when no file of the same name is found on the search path.
pub static LIBRARIES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../libraries");
