use super::*;

mod list {
    use super::*;

    #[test]
    fn should_lower_case_and_dedupe_given_mixed_case_values() {
        // Arrange & Act
        let headers = AllowedHeaders::list(["X-Trace", " x-trace ", "Content-Type", ""]);

        // Assert
        assert_eq!(
            headers,
            AllowedHeaders::List(vec!["x-trace".into(), "content-type".into()])
        );
    }
}

mod allows_headers {
    use super::*;

    #[test]
    fn should_allow_subset_given_case_and_whitespace_differences() {
        let headers = AllowedHeaders::list(["X-Trace", "Content-Type"]);

        assert!(headers.allows_headers("content-type , X-TRACE"));
    }

    #[test]
    fn should_reject_given_any_header_outside_the_list() {
        let headers = AllowedHeaders::list(["X-Trace"]);

        assert!(!headers.allows_headers("X-Trace, X-Secret"));
    }

    #[test]
    fn should_allow_given_blank_request_value() {
        let headers = AllowedHeaders::default();

        assert!(headers.allows_headers("  "));
        assert!(headers.allows_headers(" , "));
    }

    #[test]
    fn any_should_allow_everything() {
        assert!(AllowedHeaders::any().allows_headers("X-Anything, X-Else"));
    }
}
