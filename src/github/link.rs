//! `Link` response header parsing.
//!
//! GitHub paginates with entries like
//! `<https://api.github.com/...&page=2>; rel="next", <...&page=5>; rel="last"`.

/// URL of the entry carrying the given relation, if any.
pub fn rel_url<'a>(link_header: &'a str, rel: &str) -> Option<&'a str> {
    for part in link_header.split(',') {
        let part = part.trim();
        let (Some(start), Some(end)) = (part.find('<'), part.find('>')) else {
            continue;
        };
        if end <= start {
            continue;
        }

        let has_rel = part[end + 1..].split(';').any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|value| value.trim_matches('"').split_whitespace().any(|r| r == rel))
                .unwrap_or(false)
        });

        if has_rel {
            return Some(&part[start + 1..end]);
        }
    }
    None
}

pub fn has_next_page(link_header: Option<&str>) -> bool {
    link_header
        .map(|header| rel_url(header, "next").is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"<https://api.github.com/repositories/1/commits?page=2>; rel="next", <https://api.github.com/repositories/1/commits?page=9>; rel="last""#;

    #[test]
    fn finds_next_relation() {
        assert!(has_next_page(Some(FULL)));
        assert_eq!(
            rel_url(FULL, "last"),
            Some("https://api.github.com/repositories/1/commits?page=9")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let header = r#"<https://api.github.com/x?page=1>; rel="first", <https://api.github.com/x?page=4>; rel="prev""#;
        assert!(!has_next_page(Some(header)));
    }

    #[test]
    fn missing_or_empty_header() {
        assert!(!has_next_page(None));
        assert!(!has_next_page(Some("")));
    }

    #[test]
    fn next_not_confused_with_url_contents() {
        let header = r#"<https://api.github.com/x?rel=next>; rel="prev""#;
        assert!(!has_next_page(Some(header)));
    }
}
