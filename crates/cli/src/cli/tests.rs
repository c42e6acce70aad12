use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn parse_send_command() {
	let cli = Cli::try_parse_from(["wa", "send", "John Doe", "hello 👋"]).unwrap();

	match cli.command {
		Commands::Send(args) => {
			assert_eq!(args.contact, "John Doe");
			assert_eq!(args.message, "hello 👋");
		}
		_ => panic!("Expected Send command"),
	}
}

#[test]
fn parse_send_media_command() {
	let cli = Cli::try_parse_from(["wa", "send-media", "Family", "/tmp/cat.jpg"]).unwrap();

	match cli.command {
		Commands::SendMedia(args) => {
			assert_eq!(args.contact, "Family");
			assert_eq!(args.file, PathBuf::from("/tmp/cat.jpg"));
		}
		_ => panic!("Expected SendMedia command"),
	}
}

#[test]
fn parse_last_message_alias() {
	let cli = Cli::try_parse_from(["wa", "last", "John Doe"]).unwrap();
	assert!(matches!(cli.command, Commands::LastMessage(ref args) if args.contact == "John Doe"));
	assert_eq!(cli.command.name(), "last-message");
}

#[test]
fn parse_open_wait() {
	let cli = Cli::try_parse_from(["wa", "open", "--wait-ms", "5000"]).unwrap();
	assert!(matches!(cli.command, Commands::Open(OpenArgs { wait_ms: 5000 })));

	let cli = Cli::try_parse_from(["wa", "open"]).unwrap();
	assert!(matches!(cli.command, Commands::Open(OpenArgs { wait_ms: 0 })));
}

#[test]
fn global_flags_after_subcommand() {
	let cli = Cli::try_parse_from([
		"wa",
		"last-message",
		"John Doe",
		"--headless",
		"--session-dir",
		"/tmp/profile",
		"--timeout",
		"5000",
		"-f",
		"json",
	])
	.unwrap();

	assert!(cli.headless);
	assert_eq!(cli.session_dir, Some(PathBuf::from("/tmp/profile")));
	assert_eq!(cli.timeout, Some(5000));
	assert_eq!(cli.format, OutputFormat::Json);
}

#[test]
fn verbose_flag_short_and_long() {
	let cli = Cli::try_parse_from(["wa", "-vv", "run"]).unwrap();
	assert_eq!(cli.verbose, 2);

	let cli = Cli::try_parse_from(["wa", "--verbose", "run"]).unwrap();
	assert_eq!(cli.verbose, 1);
}

#[test]
fn default_format_is_toon() {
	let cli = Cli::try_parse_from(["wa", "run"]).unwrap();
	assert_eq!(cli.format, OutputFormat::Toon);
}

#[test]
fn parse_config_set() {
	let cli = Cli::try_parse_from(["wa", "config", "set", "timeout-ms", "30000"]).unwrap();
	match cli.command {
		Commands::Config(ConfigAction::Set { key, value }) => {
			assert_eq!(key, "timeout-ms");
			assert_eq!(value, "30000");
		}
		_ => panic!("Expected config set"),
	}
}

#[test]
fn send_requires_message() {
	assert!(Cli::try_parse_from(["wa", "send", "John Doe"]).is_err());
}

#[test]
fn headless_flags_last_one_wins() {
	let cli = Cli::try_parse_from(["wa", "send", "Bob", "hi"]).unwrap();
	assert_eq!(cli.headless_override(), None);

	let cli = Cli::try_parse_from(["wa", "--headless", "send", "Bob", "hi", "--no-headless"]).unwrap();
	assert_eq!(cli.headless_override(), Some(false));

	let cli = Cli::try_parse_from(["wa", "--no-headless", "open", "--headless"]).unwrap();
	assert_eq!(cli.headless_override(), Some(true));
}
