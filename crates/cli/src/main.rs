use clap::Parser;
use wa_cli::cli::Cli;
use wa_cli::error::WaError;
use wa_cli::output::{self, OutputFormat, ResultBuilder};
use wa_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli).await {
		handle_error(err, command, format);
		std::process::exit(1);
	}
}

fn handle_error(err: WaError, command: &str, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	// Humans read stderr; agents read the envelope on stdout.
	output::print_error_stderr(&cmd_error);

	if let Some(failure) = err.failure_with_artifacts() {
		output::print_failure_with_artifacts(command, failure, format);
	} else if format != OutputFormat::Text {
		let result: output::CommandResult<()> = ResultBuilder::new(command).command_error(cmd_error).build();
		output::print_result(&result, format);
	}
}
