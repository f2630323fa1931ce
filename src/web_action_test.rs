use super::*;
use crate::response::EntityKind;
use serde_json::json;

fn event(value: serde_json::Value) -> WebActionEvent {
    serde_json::from_value(value).expect("valid web action payload")
}

mod to_canonical_request {
    use super::*;

    #[test]
    fn should_build_request_from_raw_payload() {
        // Arrange
        let event = event(json!({
            "__ow_method": "post",
            "__ow_headers": { "host": "actions.test", "content-type": "text/plain" },
            "__ow_path": "/notes",
            "__ow_query": "draft=true&tag=a%20b",
            "__ow_body": "hello"
        }));

        // Act
        let request = WebActionTranslator::new()
            .to_canonical_request(&event)
            .expect("valid request");

        // Assert
        assert_eq!(request.method(), "POST");
        assert_eq!(
            request.request_uri().as_str(),
            "https://actions.test/notes?draft=true&tag=a%20b"
        );
        assert_eq!(request.body(), Some(&b"hello"[..]));
    }

    #[test]
    fn should_decode_body_given_binary_content_type() {
        let event = event(json!({
            "__ow_method": "put",
            "__ow_headers": { "content-type": "image/png" },
            "__ow_body": "iVBORw=="
        }));

        let request = WebActionTranslator::new()
            .to_canonical_request(&event)
            .expect("valid request");

        assert_eq!(request.body(), Some(&[0x89u8, 0x50, 0x4e, 0x47][..]));
        assert_eq!(request.request_uri().as_str(), "https://localhost/");
    }

    #[test]
    fn should_fail_given_missing_method() {
        let result = WebActionTranslator::new().to_canonical_request(&WebActionEvent::default());

        assert!(matches!(
            result,
            Err(TranslationError::MissingField("__ow_method"))
        ));
    }
}

mod to_platform_reply {
    use super::*;

    #[test]
    fn should_emit_single_and_multiple_header_values() {
        // Arrange
        let response = CapturedResponse::new(201)
            .with_header("Location", "/notes/1")
            .with_header("Set-Cookie", "a=1")
            .with_header("Set-Cookie", "b=2")
            .with_body("{}", EntityKind::Json);

        // Act
        let reply = WebActionTranslator::new()
            .to_platform_reply(&response, &ReplyFlags::default())
            .into_inner();

        // Assert
        assert_eq!(
            serde_json::to_value(reply).expect("serializable"),
            json!({
                "statusCode": 201,
                "headers": { "Location": "/notes/1", "Set-Cookie": ["a=1", "b=2"] },
                "body": "{}"
            })
        );
    }
}
