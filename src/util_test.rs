use super::*;

mod normalize_lower {
    use super::*;

    #[test]
    fn should_return_ascii_lowercase_when_input_ascii_then_use_fast_path() {
        let result = normalize_lower("HeAdEr");

        assert_eq!(result, "header");
    }

    #[test]
    fn should_return_unicode_lowercase_when_input_unicode_then_preserve_characters() {
        let result = normalize_lower("TÉST");

        assert_eq!(result, "tést");
    }
}

mod equals_ignore_case {
    use super::*;

    #[test]
    fn should_return_true_when_ascii_values_match_case_insensitively() {
        assert!(equals_ignore_case("Content-Type", "content-TYPE"));
    }

    #[test]
    fn should_return_false_when_ascii_values_differ() {
        assert!(!equals_ignore_case("Content-Type", "Content-Length"));
    }

    #[test]
    fn should_compare_unicode_values_case_insensitively() {
        assert!(equals_ignore_case("https://ÉXAMPLE.test", "https://éxample.test"));
    }
}

mod is_http_token {
    use super::*;

    #[test]
    fn should_accept_standard_method_names() {
        assert!(is_http_token("GET"));
        assert!(is_http_token("X-Custom-Header"));
    }

    #[test]
    fn should_reject_empty_or_separator_values() {
        assert!(!is_http_token(""));
        assert!(!is_http_token("GET POST"));
        assert!(!is_http_token("X,Y"));
    }
}

mod split_list {
    use super::*;

    #[test]
    fn should_trim_entries_and_skip_blanks() {
        let entries: Vec<&str> = split_list(" X-One ,, X-Two,  ").collect();

        assert_eq!(entries, vec!["X-One", "X-Two"]);
    }
}

mod is_binary_media_type {
    use super::*;

    #[test]
    fn should_treat_text_and_json_as_non_binary() {
        assert!(!is_binary_media_type("text/html; charset=utf-8"));
        assert!(!is_binary_media_type("application/json"));
        assert!(!is_binary_media_type("application/problem+json"));
        assert!(!is_binary_media_type(""));
    }

    #[test]
    fn should_treat_images_and_octet_streams_as_binary() {
        assert!(is_binary_media_type("image/png"));
        assert!(is_binary_media_type("application/octet-stream"));
    }
}
