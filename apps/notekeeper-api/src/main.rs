use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = notekeeper_api::Args::parse();

	notekeeper_api::run(args).await
}
