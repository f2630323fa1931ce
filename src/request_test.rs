use super::*;

mod build {
    use super::*;

    #[test]
    fn should_upper_case_method_and_derive_base_uri_given_minimal_fields() {
        // Arrange
        let builder = CanonicalRequest::builder()
            .method("get")
            .request_uri("https://api.test/users?page=2");

        // Act
        let request = builder.build().expect("valid request");

        // Assert
        assert_eq!(request.method(), "GET");
        assert_eq!(request.request_uri().as_str(), "https://api.test/users?page=2");
        assert_eq!(request.base_uri().as_str(), "https://api.test/");
        assert_eq!(request.path(), "/users");
        assert!(request.body().is_none());
    }

    #[test]
    fn should_fail_with_missing_method_given_blank_method() {
        // Arrange
        let builder = CanonicalRequest::builder()
            .method("  ")
            .request_uri("https://api.test/");

        // Act
        let result = builder.build();

        // Assert
        assert!(matches!(result, Err(TranslationError::MissingField("method"))));
    }

    #[test]
    fn should_fail_with_missing_uri_given_no_request_uri() {
        // Arrange
        let builder = CanonicalRequest::builder().method("GET");

        // Act
        let result = builder.build();

        // Assert
        assert!(matches!(
            result,
            Err(TranslationError::MissingField("requestUri"))
        ));
    }

    #[test]
    fn should_reject_method_with_separators() {
        let result = CanonicalRequest::builder()
            .method("GE T")
            .request_uri("https://api.test/")
            .build();

        assert!(matches!(result, Err(TranslationError::InvalidMethod(_))));
    }

    #[test]
    fn should_reject_relative_uri() {
        let result = CanonicalRequest::builder()
            .method("GET")
            .request_uri("/users")
            .build();

        assert!(matches!(result, Err(TranslationError::InvalidUri { .. })));
    }

    #[test]
    fn should_strip_base_path_given_stage_base_uri() {
        // Arrange & Act
        let request = CanonicalRequest::builder()
            .method("POST")
            .request_uri("https://api.test/prod/orders/7")
            .base_uri("https://api.test/prod")
            .body("{}")
            .build()
            .expect("valid request");

        // Assert
        assert_eq!(request.base_uri().as_str(), "https://api.test/prod/");
        assert_eq!(request.path(), "/orders/7");
        assert_eq!(request.body(), Some(&b"{}"[..]));
    }

    #[test]
    fn should_keep_context_values_given_typed_context() {
        #[derive(Clone, Debug, PartialEq)]
        struct RequestId(&'static str);

        let request = CanonicalRequest::builder()
            .method("GET")
            .request_uri("https://api.test/")
            .context(RequestId("abc"))
            .build()
            .expect("valid request");

        assert_eq!(request.context().get::<RequestId>(), Some(&RequestId("abc")));
    }
}

mod authority_root {
    use super::*;

    #[test]
    fn should_use_forwarded_proto_and_host_given_both_headers() {
        let headers: HeaderMap = [("Host", "api.test"), ("X-Forwarded-Proto", "http")]
            .into_iter()
            .collect();

        assert_eq!(authority_root(&headers, "localhost"), "http://api.test");
    }

    #[test]
    fn should_fall_back_to_https_and_default_authority_given_no_headers() {
        let headers = HeaderMap::new();

        assert_eq!(authority_root(&headers, "localhost"), "https://localhost");
    }
}

mod compose_uri {
    use super::*;

    #[test]
    fn should_encode_path_and_query_given_raw_values() {
        // Arrange
        let query = [("q", "a b"), ("tag", "x&y")];

        // Act
        let uri = compose_uri("https://api.test", "/search/my docs", query).expect("valid uri");

        // Assert
        assert_eq!(uri.path(), "/search/my%20docs");
        assert_eq!(uri.query(), Some("q=a+b&tag=x%26y"));
    }

    #[test]
    fn should_omit_query_given_no_pairs() {
        let uri = compose_uri("https://api.test", "/items", std::iter::empty()).expect("valid uri");

        assert_eq!(uri.as_str(), "https://api.test/items");
    }

    #[test]
    fn should_fail_given_unparseable_root() {
        let result = compose_uri("https://", "/", std::iter::empty());

        assert!(matches!(result, Err(TranslationError::InvalidUri { .. })));
    }
}
