//! Files from the `assets` directory, embedded at compile time.
//!
//! Every text file becomes a `&str` constant named after the file in screaming
//! snake case (`config.toml` -> `CONFIG_TOML`), every subdirectory a module.

include!(env!("ASSETS"));
