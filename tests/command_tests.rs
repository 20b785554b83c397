//! Tests for shell command parsing
//!
//! These tests verify:
//! - Parsing of every command
//! - KeyRequired when a key is missing
//! - Rejection of unknown commands and stray arguments

use logcask::command::Command;
use logcask::CaskError;

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_get() {
    assert_eq!(
        Command::parse("get mykey").unwrap(),
        Command::Get {
            key: b"mykey".to_vec()
        }
    );
}

#[test]
fn test_parse_put_keeps_rest_of_line_as_value() {
    assert_eq!(
        Command::parse("put greeting  hello  world").unwrap(),
        Command::Put {
            key: b"greeting".to_vec(),
            value: b"hello  world".to_vec(),
        }
    );
}

#[test]
fn test_parse_put_without_value() {
    assert_eq!(
        Command::parse("put key").unwrap(),
        Command::Put {
            key: b"key".to_vec(),
            value: Vec::new(),
        }
    );
}

#[test]
fn test_parse_aliases_and_case() {
    assert_eq!(
        Command::parse("SET k v").unwrap(),
        Command::Put {
            key: b"k".to_vec(),
            value: b"v".to_vec(),
        }
    );
    assert_eq!(
        Command::parse("delete k").unwrap(),
        Command::Delete { key: b"k".to_vec() }
    );
    assert_eq!(
        Command::parse("  Del k  ").unwrap(),
        Command::Delete { key: b"k".to_vec() }
    );
}

#[test]
fn test_parse_keys_and_sync() {
    assert_eq!(Command::parse("keys").unwrap(), Command::Keys);
    assert_eq!(Command::parse("sync").unwrap(), Command::Sync);
}

#[test]
fn test_parse_empty_key_token() {
    assert_eq!(
        Command::parse("put \"\" empty").unwrap(),
        Command::Put {
            key: Vec::new(),
            value: b"empty".to_vec(),
        }
    );
    assert_eq!(
        Command::parse("get \"\"").unwrap(),
        Command::Get { key: Vec::new() }
    );
}

#[test]
fn test_is_read() {
    assert!(Command::parse("get k").unwrap().is_read());
    assert!(Command::Keys.is_read());
    assert!(!Command::parse("put k v").unwrap().is_read());
    assert!(!Command::Sync.is_read());
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_missing_key_is_key_required() {
    for line in ["get", "put", "del", "  delete   "] {
        let result = Command::parse(line);
        assert!(
            matches!(result, Err(CaskError::KeyRequired)),
            "expected KeyRequired for {:?}",
            line
        );
    }
}

#[test]
fn test_unknown_command() {
    let result = Command::parse("frobnicate k");
    assert!(matches!(result.unwrap_err(), CaskError::InvalidCommand(_)));
}

#[test]
fn test_empty_command() {
    let result = Command::parse("   ");
    assert!(matches!(result.unwrap_err(), CaskError::InvalidCommand(_)));
}

#[test]
fn test_extra_arguments_rejected() {
    assert!(matches!(
        Command::parse("get a b"),
        Err(CaskError::InvalidCommand(_))
    ));
    assert!(matches!(
        Command::parse("keys a"),
        Err(CaskError::InvalidCommand(_))
    ));
}
