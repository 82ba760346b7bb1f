// tests/formatter_tests.rs - library-level end to end: JSON line in, logfmt line out
use kvfmt::{JsonlRecordParser, Level, LogfmtFormatter, RecordFormatter};

fn render(line: &str) -> String {
    let parser = JsonlRecordParser::new();
    let formatter = LogfmtFormatter {
        disable_colors: true,
        ..LogfmtFormatter::default()
    };
    let record = parser.parse_line(line, 1).unwrap();
    formatter.format(&record)
}

#[test]
fn test_server_started_line() {
    let line = render(
        r#"{"time":"2024-01-02T03:04:05.006Z","level":"info","msg":"server started","port":8080}"#,
    );
    assert_eq!(
        line,
        "time=\"2024-01-02T03:04:05.006Z\" level=info msg=\"server started\" port=8080\n"
    );
}

#[test]
fn test_disk_low_line_sorts_user_fields_after_fixed() {
    let line = render(
        r#"{"ts":"2024-01-02T03:04:05.006Z","level":"warn","msg":"disk low","path":"/var/log","free":5}"#,
    );
    assert_eq!(
        line,
        "time=\"2024-01-02T03:04:05.006Z\" level=warn msg=\"disk low\" free=5 path=/var/log\n"
    );
}

#[test]
fn test_formatter_is_shareable_across_threads() {
    let formatter = std::sync::Arc::new(LogfmtFormatter {
        disable_colors: true,
        ..LogfmtFormatter::default()
    });

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let formatter = formatter.clone();
            std::thread::spawn(move || {
                let record = kvfmt::Record::new(Level::Info, "tick")
                    .with_field("worker", worker as i64);
                formatter.format(&record)
            })
        })
        .collect();

    for handle in handles {
        let line = handle.join().unwrap();
        assert!(line.contains("msg=tick"));
    }
}

#[test]
fn test_multiline_input_produces_one_line_each() {
    let input = r#"{"level":"info","msg":"one"}
{"level":"error","msg":"two"}"#;

    let parser = JsonlRecordParser::new();
    let formatter = LogfmtFormatter {
        disable_colors: true,
        disable_timestamp: true,
        ..LogfmtFormatter::default()
    };

    let mut output = String::new();
    let mut line_buffer = String::new();
    for (index, line) in input.lines().enumerate() {
        let record = parser.parse_line(line, index + 1).unwrap();
        line_buffer.clear();
        formatter.format_into(&record, &mut line_buffer);
        output.push_str(&line_buffer);
    }

    assert_eq!(output, "level=info msg=one\nlevel=error msg=two\n");
}

#[test]
fn test_parsed_level_drives_key_colors() {
    let parser = JsonlRecordParser::new();
    let formatter = LogfmtFormatter {
        disable_timestamp: true,
        ..LogfmtFormatter::default()
    };

    let record = parser
        .parse_line(r#"{"level":"error","msg":"boom"}"#, 1)
        .unwrap();
    assert_eq!(record.level, Level::Error);

    let line = formatter.format(&record);
    assert!(line.contains("\x1b[31mlevel\x1b[0m=error"));
    assert!(line.contains("\x1b[31mmsg\x1b[0m=boom"));
}
