use super::*;
use crate::constants::header;

mod new {
    use super::*;

    #[test]
    fn should_start_empty_when_called() {
        // Arrange & Act
        let headers = HeaderMap::new();

        // Assert
        assert!(headers.is_empty());
        assert_eq!(headers.len(), 0);
    }
}

mod append {
    use super::*;

    #[test]
    fn should_keep_insertion_order_given_multiple_values_for_same_name() {
        // Arrange
        let mut headers = HeaderMap::new();

        // Act
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");

        // Assert
        assert_eq!(headers.get_all("SET-COOKIE"), ["a=1", "b=2"]);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn should_preserve_first_seen_casing_given_mixed_case_names() {
        // Arrange
        let mut headers = HeaderMap::new();

        // Act
        headers.append("X-Trace-Id", "1");
        headers.append("x-trace-id", "2");

        // Assert
        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["X-Trace-Id"]);
    }
}

mod insert {
    use super::*;

    #[test]
    fn should_replace_existing_values_given_name_matches_case_insensitively() {
        // Arrange
        let mut headers = HeaderMap::new();
        headers.append("Content-Type", "text/plain");
        headers.append("Content-Type", "text/html");

        // Act
        headers.insert("content-type", "application/json");

        // Assert
        assert_eq!(headers.get_all(header::CONTENT_TYPE), ["application/json"]);
    }
}

mod remove {
    use super::*;

    #[test]
    fn should_return_values_and_drop_entry_given_header_exists() {
        // Arrange
        let mut headers: HeaderMap = [("Content-Encoding", "gzip")].into_iter().collect();

        // Act
        let removed = headers.remove("content-encoding");

        // Assert
        assert_eq!(removed, Some(vec!["gzip".to_string()]));
        assert!(!headers.contains(header::CONTENT_ENCODING));
    }

    #[test]
    fn should_return_none_given_header_missing() {
        let mut headers = HeaderMap::new();

        assert_eq!(headers.remove("X-Missing"), None);
    }
}

mod add_vary {
    use super::*;

    #[test]
    fn should_store_unique_entries_given_values_have_mixed_case() {
        // Arrange
        let mut headers = HeaderMap::new();

        // Act
        headers.add_vary("Origin");
        headers.add_vary("Accept-Encoding");
        headers.add_vary("origin");

        // Assert
        assert_eq!(headers.get(header::VARY), Some("Origin, Accept-Encoding"));
    }

    #[test]
    fn should_merge_with_existing_vary_given_engine_already_set_one() {
        // Arrange
        let mut headers = HeaderMap::new();
        headers.append("vary", "Accept");

        // Act
        headers.add_vary("Origin");

        // Assert
        assert_eq!(headers.get_all(header::VARY), ["Accept, Origin"]);
    }

    #[test]
    fn should_not_create_header_given_value_is_whitespace() {
        // Arrange
        let mut headers = HeaderMap::new();

        // Act
        headers.add_vary("   ");

        // Assert
        assert!(!headers.contains(header::VARY));
    }
}

mod extend {
    use super::*;

    #[test]
    fn should_append_values_and_merge_vary_given_other_collection() {
        // Arrange
        let mut headers: HeaderMap = [("Vary", "Accept"), ("X-One", "1")].into_iter().collect();
        let other: HeaderMap = [("vary", "Origin"), ("x-one", "2")].into_iter().collect();

        // Act
        headers.extend(other);

        // Assert
        assert_eq!(headers.get(header::VARY), Some("Accept, Origin"));
        assert_eq!(headers.get_all("X-One"), ["1", "2"]);
    }
}
