use vergen_gix::{Emitter, GixBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Git sha and commit date of this tool itself, shown by `release-tools --version`.
    let gix = GixBuilder::default().sha(true).commit_date(true).build()?;

    Emitter::default().add_instructions(&gix)?.emit()?;

    Ok(())
}
