//! `Link` header pagination.
//!
//! GitHub sends `<https://api.github.com/repositories/1/issues?page=2>; rel="next", <...&page=9>; rel="last"`.

/// Page numbers advertised by a `Link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkPagination {
    pub next_page: Option<u64>,
    pub last_page: Option<u64>,
}

pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;
        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment
                .strip_prefix('<')
                .and_then(|s| s.strip_suffix('>'))
            {
                url = Some(inner);
            } else if let Some(value) = segment.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel)) = (url, rel)
            && let Some(page) = extract_page_from_url(url)
        {
            match rel {
                "next" => info.next_page = Some(page),
                "last" => info.last_page = Some(page),
                _ => {}
            }
        }
    }

    info
}

/// Next page number from an optional `Link` header, 0 when there is none.
pub fn next_page_from_link(link_header: Option<&str>) -> u64 {
    link_header
        .map(parse_link_header)
        .and_then(|info| info.next_page)
        .unwrap_or(0)
}

pub(crate) fn extract_page_from_url(url: &str) -> Option<u64> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|v| v.parse().ok())
}
