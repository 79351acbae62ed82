//! Small helpers shared by the HTML adapters (FBref, Transfermarkt).

use scraper::{ElementRef, Selector};
use std::str::FromStr;

use crate::error::AppError;

/// Compiles a CSS selector.
pub fn selector(css: &str) -> Result<Selector, AppError> {
    Ok(Selector::parse(css)?)
}

/// First element matching `css` below `scope`, or an element-not-found error.
/// A missing element means the page layout changed upstream.
pub fn select_first<'a>(
    scope: ElementRef<'a>,
    css: &str,
    url: &str,
) -> Result<ElementRef<'a>, AppError> {
    let sel = selector(css)?;
    scope
        .select(&sel)
        .next()
        .ok_or_else(|| AppError::element_not_found(css, url))
}

/// Whitespace-collapsed text of an element.
pub fn text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match of an already compiled selector, `None` when absent
/// or blank.
pub fn select_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(text)
        .filter(|t| !t.is_empty())
}

/// Text of the `td`/`th` carrying `data-stat="<stat>"` in an FBref-style row.
pub fn stat_cell(row: ElementRef<'_>, stat: &str) -> Result<Option<String>, AppError> {
    let sel = selector(&format!("[data-stat=\"{stat}\"]"))?;
    Ok(select_text(row, &sel))
}

/// Parses a number, tolerating thousands separators.
pub fn parse_number<T: FromStr>(raw: &str) -> Option<T> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse().ok()
}

/// Non-empty path segments of a site-relative link.
pub fn path_segments(href: &str) -> Vec<&str> {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let path = path
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or_default())
        .unwrap_or(path);
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Segment immediately following `marker` in a link, e.g. the id after
/// `players` in `/en/players/98ea5115/David-Raya`.
pub fn segment_after<'a>(href: &'a str, marker: &str) -> Option<&'a str> {
    let segments = path_segments(href);
    let position = segments.iter().position(|s| *s == marker)?;
    segments.get(position + 1).copied()
}

/// Link target of an element.
pub fn href(element: ElementRef<'_>) -> Option<&str> {
    element.value().attr("href")
}

/// FBref hides most secondary tables inside HTML comments; strip the markers
/// so they become part of the DOM.
pub fn uncomment(body: &str) -> String {
    body.replace("<!--", "").replace("-->", "")
}

/// Parses Transfermarkt market values such as `€1.12bn`, `€75.00m` or `€500k`
/// into whole euros.
pub fn parse_market_value(raw: &str) -> Option<u64> {
    let value = raw.split_whitespace().next()?.trim_start_matches('€');
    let (number, multiplier) = if let Some(n) = value.strip_suffix("bn") {
        (n, 1_000_000_000.0)
    } else if let Some(n) = value.strip_suffix('m') {
        (n, 1_000_000.0)
    } else if let Some(n) = value.strip_suffix('k') {
        (n, 1_000.0)
    } else {
        (value, 1.0)
    };
    let number: f64 = number.parse().ok()?;
    Some((number * multiplier).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_select_first_and_text() {
        let doc = Html::parse_document("<div><h1>  David\n   Raya </h1></div>");
        let h1 = select_first(doc.root_element(), "h1", "u").unwrap();
        assert_eq!(text(h1), "David Raya");
    }

    #[test]
    fn test_select_first_missing_element() {
        let doc = Html::parse_document("<div></div>");
        let err = select_first(doc.root_element(), "table#stats", "https://fbref.com/x").unwrap_err();
        assert!(matches!(err, AppError::ElementNotFound { .. }));
        assert!(err.to_string().contains("table#stats"));
    }

    #[test]
    fn test_stat_cell() {
        let doc = Html::parse_document(
            r#"<table><tr><th data-stat="team">Arsenal</th><td data-stat="points">89</td><td data-stat="xg"></td></tr></table>"#,
        );
        let row = select_first(doc.root_element(), "tr", "u").unwrap();
        assert_eq!(stat_cell(row, "points").unwrap(), Some("89".to_string()));
        assert_eq!(stat_cell(row, "team").unwrap(), Some("Arsenal".to_string()));
        assert_eq!(stat_cell(row, "xg").unwrap(), None);
        assert_eq!(stat_cell(row, "missing").unwrap(), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u32>("3,420"), Some(3420));
        assert_eq!(parse_number::<f64>("1.5"), Some(1.5));
        assert_eq!(parse_number::<u32>(""), None);
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(
            path_segments("/en/players/98ea5115/David-Raya"),
            vec!["en", "players", "98ea5115", "David-Raya"]
        );
        assert_eq!(
            path_segments("https://fbref.com/en/comps/9/Premier-League-Stats?x=1"),
            vec!["en", "comps", "9", "Premier-League-Stats"]
        );
        assert_eq!(segment_after("/david-raya/profil/spieler/262749", "spieler"), Some("262749"));
        assert_eq!(segment_after("/en/players/", "players"), None);
    }

    #[test]
    fn test_uncomment() {
        let body = "<div><!--\n<table id=\"t\"></table>\n--></div>";
        let doc = Html::parse_document(&uncomment(body));
        assert!(select_first(doc.root_element(), "table#t", "u").is_ok());
    }

    #[test]
    fn test_parse_market_value() {
        assert_eq!(parse_market_value("€1.12bn"), Some(1_120_000_000));
        assert_eq!(parse_market_value("€75.00m Last update: 19/12/2023"), Some(75_000_000));
        assert_eq!(parse_market_value("€500k"), Some(500_000));
        assert_eq!(parse_market_value("-"), None);
    }
}
