//! Command-line interface for the `pivotal` application.
//!
//! This binary is a thin entry point; argument parsing and command
//! handling live in the `pivotal` library crate.

fn main() -> anyhow::Result<()> {
    pivotal::run()
}
