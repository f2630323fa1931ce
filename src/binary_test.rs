use super::*;

const BINARY_KINDS: [EntityKind; 5] = [
    EntityKind::Bytes,
    EntityKind::File,
    EntityKind::Streaming,
    EntityKind::Reader,
    EntityKind::DataSource,
];

const TEXT_KINDS: [EntityKind; 4] = [
    EntityKind::Empty,
    EntityKind::Buffer,
    EntityKind::Text,
    EntityKind::Json,
];

fn policy(non_binary_compression_only: bool) -> BinaryPolicy {
    BinaryPolicy {
        non_binary_compression_only,
    }
}

fn response(kind: EntityKind, gzip: bool) -> CapturedResponse {
    let response = CapturedResponse::new(200).with_body(Vec::<u8>::new(), kind);
    if gzip {
        response.with_header("Content-Encoding", "gzip")
    } else {
        response
    }
}

fn buffer(content_type: &str, body: &[u8]) -> CapturedResponse {
    CapturedResponse::new(200)
        .with_header("Content-Type", content_type)
        .with_body(body, EntityKind::Buffer)
}

mod classify {
    use super::*;

    #[test]
    fn should_flag_binary_kinds_regardless_of_policy() {
        for kind in BINARY_KINDS {
            for restricted in [true, false] {
                for gzip in [false, true] {
                    let decision = policy(restricted).classify(&response(kind, gzip));

                    assert!(decision.platform_binary, "{kind:?} must be binary");
                    assert!(!decision.strip_content_encoding);
                }
            }
        }
    }

    #[test]
    fn should_flag_compressed_text_only_when_policy_allows_compression() {
        for kind in TEXT_KINDS {
            let relaxed = policy(false).classify(&response(kind, true));
            let restricted = policy(true).classify(&response(kind, true));

            assert!(relaxed.platform_binary, "{kind:?} compressed + relaxed");
            assert!(!relaxed.strip_content_encoding);
            assert!(!restricted.platform_binary, "{kind:?} compressed + restricted");
            assert!(restricted.strip_content_encoding);
        }
    }

    #[test]
    fn should_not_flag_uncompressed_text() {
        for kind in TEXT_KINDS {
            for restricted in [true, false] {
                let decision = policy(restricted).classify(&response(kind, false));

                assert_eq!(decision, BinaryDecision::default());
            }
        }
    }

    #[test]
    fn should_flag_buffer_given_binary_content_type() {
        let png = [0x89u8, 0x50, 0x4e, 0x47, 0xff, 0xfe];

        let decision = BinaryPolicy::default().classify(&buffer("image/png", &png));

        assert!(decision.platform_binary);
    }

    #[test]
    fn should_flag_buffer_given_invalid_utf8_under_text_content_type() {
        let decision = BinaryPolicy::default().classify(&buffer("text/plain", &[0xff, 0x00, 0xfe]));

        assert!(decision.platform_binary);
    }

    #[test]
    fn should_not_flag_buffer_given_utf8_text() {
        let decision =
            BinaryPolicy::default().classify(&buffer("application/json", br#"{"ok":true}"#));

        assert_eq!(decision, BinaryDecision::default());
    }
}

mod apply {
    use super::*;

    #[test]
    fn should_remove_content_encoding_given_restricted_text_response() {
        // Arrange
        let mut response = CapturedResponse::new(200)
            .with_header("Content-Encoding", "gzip")
            .with_body("plain", EntityKind::Text);

        // Act
        let decision = BinaryPolicy::default().apply(&mut response);

        // Assert
        assert!(decision.strip_content_encoding);
        assert!(!response.headers.contains(header::CONTENT_ENCODING));
    }

    #[test]
    fn should_keep_content_encoding_given_binary_response() {
        let mut response = CapturedResponse::new(200)
            .with_header("Content-Encoding", "gzip")
            .with_body(vec![1u8, 2, 3], EntityKind::Bytes);

        let decision = BinaryPolicy::default().apply(&mut response);

        assert!(decision.platform_binary);
        assert_eq!(response.headers.get(header::CONTENT_ENCODING), Some("gzip"));
    }
}

mod settings {
    use super::*;

    #[test]
    fn should_default_to_restricting_compression_given_empty_json() {
        let policy: BinaryPolicy = serde_json::from_str("{}").expect("valid json");

        assert!(policy.non_binary_compression_only);
    }

    #[test]
    fn should_read_camel_case_flag() {
        let policy: BinaryPolicy =
            serde_json::from_str(r#"{"nonBinaryCompressionOnly":false}"#).expect("valid json");

        assert!(!policy.non_binary_compression_only);
    }
}
