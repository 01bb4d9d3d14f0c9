//! # CLI Commands
//!
//! One module per subcommand. Each exposes `run(...)` returning
//! `anyhow::Result<()>`; `main` prints the error chain on failure.
//!
//! ```text
//! solar-quote quote       → quote::run
//! solar-quote catalog ... → catalog::run
//! solar-quote integrator  → integrator::run
//! solar-quote archive ... → archive::run
//! solar-quote seed        → seed::run
//! ```

pub mod archive;
pub mod catalog;
pub mod integrator;
pub mod quote;
pub mod seed;
