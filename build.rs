//! Stamps the git revision into the `ezchart --version` long output.

use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
