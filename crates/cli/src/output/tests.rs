use super::*;

#[test]
fn result_builder_success() {
	let result: CommandResult<SendData> = ResultBuilder::new("send")
		.inputs(CommandInputs {
			contact: Some("John Doe".into()),
			message: Some("hi".into()),
			..Default::default()
		})
		.data(SendData {
			contact: "John Doe".into(),
			message: "hi".into(),
			summary: "Message sent to John Doe: hi".into(),
		})
		.build();

	assert!(result.ok);
	assert_eq!(result.command, "send");
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
	assert!(result.data.is_some());
	assert!(result.error.is_none());
	assert!(result.timings.is_some());
}

#[test]
fn result_builder_error() {
	let result: CommandResult<SendMediaData> = ResultBuilder::new("send-media")
		.error(ErrorCode::FileNotFound, "the file path does not exist: cat.jpg")
		.build();

	assert!(!result.ok);
	assert!(result.data.is_none());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::FileNotFound);
}

#[test]
fn error_code_display_matches_serde() {
	for code in [
		ErrorCode::BrowserLaunchFailed,
		ErrorCode::SelectorNotFound,
		ErrorCode::FileNotFound,
		ErrorCode::LoginRequired,
		ErrorCode::UnknownCommand,
	] {
		let json = serde_json::to_value(code).unwrap();
		assert_eq!(json.as_str().unwrap(), code.to_string());
	}
	assert_eq!(ErrorCode::Timeout.to_string(), "TIMEOUT");
}

#[test]
fn output_format_parse() {
	assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
	assert_eq!("NDJSON".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
	assert!("yaml".parse::<OutputFormat>().is_err());
}

#[test]
fn last_message_data_flattens_kind() {
	let result: CommandResult<LastMessageData> = ResultBuilder::new("last-message")
		.data(LastMessageData::new("John Doe", MessageKind::Text { text: "see you".into() }))
		.build();

	let json = serde_json::to_value(&result).unwrap();
	assert_eq!(json["ok"], true);
	assert_eq!(json["data"]["kind"], "text");
	assert_eq!(json["data"]["text"], "see you");
	assert_eq!(json["data"]["summary"], "Text message: see you");
	assert_eq!(json["data"]["contact"], "John Doe");
}

#[test]
fn unknown_message_has_only_kind_and_summary() {
	let data = serde_json::to_value(LastMessageData::new("Team", MessageKind::Unknown)).unwrap();
	assert_eq!(
		data,
		serde_json::json!({ "contact": "Team", "kind": "unknown", "summary": "Unknown message type" })
	);
}

#[test]
fn failure_envelope_carries_artifacts() {
	let failure = FailureWithArtifacts::new(CommandError {
		code: ErrorCode::SelectorNotFound,
		message: "element not found".into(),
		details: None,
	})
	.with_artifacts(vec![Artifact {
		artifact_type: ArtifactType::Screenshot,
		path: "/tmp/wa/send-failure.png".into(),
		size_bytes: Some(2048),
	}]);

	let result: CommandResult<()> = ResultBuilder::new("send")
		.command_error(failure.error.clone())
		.artifacts(failure.artifacts.clone())
		.build();

	let json = serde_json::to_value(&result).unwrap();
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "SELECTOR_NOT_FOUND");
	assert_eq!(json["artifacts"][0]["type"], "screenshot");
	assert_eq!(json["artifacts"][0]["sizeBytes"], 2048);
}
