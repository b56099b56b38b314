// SPDX-License-Identifier: Apache-2.0

// Error handling tests for the API

use jspr::{ErrKind, Organism, ParseError, ScanConfig};

fn structural_kind(json: &str) -> ErrKind {
    match Organism::parse(json) {
        Err(ParseError::Structural(e)) => e.kind,
        other => panic!("Expected structural error for {:?}, got: {:?}", json, other),
    }
}

#[test]
fn test_double_closing_token() {
    assert_eq!(
        structural_kind(r#"{"key":,"key2":123}"#),
        ErrKind::DoubleSeparator
    );
}

#[test]
fn test_key_without_value() {
    assert_eq!(
        structural_kind(r#"{"key" : "value", "key2"}"#),
        ErrKind::KeyWithoutValue
    );
}

#[test]
fn test_error_position() {
    match Organism::parse(r#"{"a":1,"b"x:2}"#) {
        Err(ParseError::Structural(e)) => {
            assert_eq!(e.kind, ErrKind::UnexpectedAfterString);
            assert_eq!(e.character, b'x');
            assert_eq!(e.position, 10);
        }
        other => panic!("Expected structural error, got: {:?}", other),
    }
}

#[test]
fn test_unquoted_key() {
    let json = r#"{name: "value"}"#;
    assert_eq!(
        Organism::parse(json).err(),
        Some(ParseError::StrictJsonViolation { position: 1 })
    );
}

#[test]
fn test_depth_limit() {
    let mut json = String::new();
    for i in 0..40 {
        json.push_str(&format!("{{\"k{i}\":"));
    }
    json.push('1');
    for _ in 0..40 {
        json.push('}');
    }

    match Organism::parse(&json) {
        Err(ParseError::MaxDepthReached { depth, .. }) => assert_eq!(depth, 33),
        other => panic!("Expected MaxDepthReached, got: {:?}", other),
    }

    let config = ScanConfig::default().with_max_depth(40);
    let organism = Organism::parse_with_config(json.as_bytes(), config).unwrap();
    assert_eq!(organism.len(), 40);
    assert!(organism.contains_key("k0.k1.k2.k3.k4.k5.k6.k7.k8.k9.k10"));
}

#[test]
fn test_error_display() {
    let err = Organism::parse(r#"{"key":}"#).unwrap_err();
    assert_eq!(err.to_string(), "structural error: MissingValue(}) at 7");
}

mod should_fail {
    use super::*;

    macro_rules! generate_fail_tests {
        ($($name:ident => $json:expr, $kind:expr;)*) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<test_fail_ $name>]() {
                        assert_eq!(structural_kind($json), $kind, "input: {:?}", $json);
                    }
                }
            )*
        };
    }

    generate_fail_tests!(
        empty_object => "{}", ErrKind::EmptyObject;
        nested_empty_object => r#"{"a":{}}"#, ErrKind::EmptyObject;
        trailing_comma => r#"{"a":1,}"#, ErrKind::TrailingComma;
        missing_value => r#"{"a": }"#, ErrKind::MissingValue;
        leading_comma => r#"{,"a":1}"#, ErrKind::DoubleSeparator;
        double_colon => r#"{"a"::1}"#, ErrKind::DoubleSeparator;
        second_colon => r#"{"a":1:2}"#, ErrKind::UnexpectedColon;
        object_as_key => r#"{{"a":1}}"#, ErrKind::UnexpectedObject;
        object_after_primitive => r#"{"a":1{"b":2}}"#, ErrKind::UnexpectedObject;
        garbage_after_object => r#"{"a":{"b":1}c}"#, ErrKind::UnexpectedAfterObject;
        quote_after_string => r#"{"a":"b""c"}"#, ErrKind::UnexpectedAfterString;
        array_root => "[1,2]", ErrKind::InvalidRoot;
        bare_root => "123", ErrKind::InvalidRoot;
        empty_input => "", ErrKind::UnexpectedEnd;
        unclosed_object => r#"{"a":1"#, ErrKind::UnexpectedEnd;
        unclosed_nested => r#"{"a":{"b":1}"#, ErrKind::UnexpectedEnd;
        unterminated_string => r#"{"a":"b}"#, ErrKind::UnexpectedEnd;
        content_after_root => r#"{"a":1}{"b":2}"#, ErrKind::ContentEnded;
        control_in_value => "{\"a\":\u{1}\u{2}}", ErrKind::ControlCharacter;
        control_in_string => "{\"a\":\"b\u{0}\"}", ErrKind::ControlCharacter;
    );
}

mod flat_populate {
    use super::*;

    #[test]
    fn test_populate_unquoted_key() {
        let mut organism = Organism::new("{key:12345}");
        assert_eq!(
            organism.populate(),
            Err(ParseError::StrictJsonViolation { position: 1 })
        );
    }

    #[test]
    fn test_populate_capacity() {
        let json = br#"{"a":1,"b":2,"c":3}"#;
        let mut organism = Organism::with_capacity_limit(json, 2).unwrap();
        assert_eq!(
            organism.populate(),
            Err(ParseError::CapacityExceeded { capacity: 2 })
        );
    }

    #[test]
    fn test_presized_shape_error() {
        assert_eq!(
            Organism::presized(br#"{"a":1,"b"}"#).err(),
            Some(ParseError::ShapeError {
                colons: 1,
                commas: 1
            })
        );
    }
}
