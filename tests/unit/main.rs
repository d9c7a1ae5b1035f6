//! Unit tests mirroring the `src/` tree

mod io;
