use std::error::Error;

use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn Error>> {
	let mut emitter = Emitter::default();

	emitter.add_instructions(&CargoBuilder::default().target_triple(true).build()?)?;
	// Falls back to a placeholder SHA outside a git checkout.
	emitter.add_instructions(&GitclBuilder::default().sha(true).build()?)?;
	emitter.emit()?;

	Ok(())
}
