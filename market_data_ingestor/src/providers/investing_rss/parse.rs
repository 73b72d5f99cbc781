//! RSS 2.0 parsing into [`NewsRecord`]s.
//!
//! `channel/title` becomes the section of every item; `item/title`, `item/pubDate`
//! and `item/link` fill the rest. Items without a title or with an unreadable
//! date are dropped.

use chrono::{DateTime, NaiveDateTime, Utc};
use roxmltree::{Document, Node};
use tracing::debug;

use crate::models::{news::NewsRecord, zone::Zone};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a `pubDate` into a naive timestamp in `store_zone`.
///
/// Zoned values (RFC 2822, RFC 3339) are converted by their own offset. Naive
/// values are read as wall-clock time in `naive_zone`.
pub fn parse_pub_date(raw: &str, naive_zone: Zone, store_zone: Zone) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(store_zone.wall_clock(dt.with_timezone(&Utc)));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(store_zone.wall_clock(dt.with_timezone(&Utc)));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|n| naive_zone.convert(n, store_zone))
}

fn child_text<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name().eq_ignore_ascii_case(name))
        .and_then(|c| c.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn parse_rss(
    xml: &str,
    naive_zone: Zone,
    store_zone: Zone,
) -> Result<Vec<NewsRecord>, roxmltree::Error> {
    let doc = Document::parse(xml)?;

    let section = doc
        .descendants()
        .find(|n| n.has_tag_name("channel"))
        .and_then(|c| child_text(&c, "title"))
        .unwrap_or_default()
        .to_string();

    let mut out = Vec::new();
    let mut dropped = 0usize;
    for item in doc.descendants().filter(|n| n.has_tag_name("item")) {
        let title = child_text(&item, "title");
        let ts = child_text(&item, "pubDate").and_then(|s| parse_pub_date(s, naive_zone, store_zone));
        match (title, ts) {
            (Some(title), Some(timestamp)) => out.push(NewsRecord {
                timestamp,
                section: section.clone(),
                title: title.to_string(),
                link: child_text(&item, "link").unwrap_or_default().to_string(),
            }),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(%section, dropped, "items without title or readable pubDate");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Новости рынка сырья</title>
    <item>
      <title>Нефть дорожает</title>
      <pubDate>2025-01-02 16:05:00</pubDate>
      <link>https://ru.investing.com/news/1</link>
    </item>
    <item>
      <title>Золото дешевеет</title>
      <pubDate>Thu, 02 Jan 2025 19:10:00 +0300</pubDate>
      <link>https://ru.investing.com/news/2</link>
    </item>
    <item>
      <title>Без даты</title>
    </item>
    <item>
      <pubDate>2025-01-02 16:07:00</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn items_become_records_in_store_zone() {
        let recs = parse_rss(FEED, Zone::Gmt, Zone::Gmt).unwrap();
        assert_eq!(recs.len(), 2);

        assert_eq!(recs[0].title, "Нефть дорожает");
        assert_eq!(recs[0].section, "Новости рынка сырья");
        assert_eq!(recs[0].timestamp, at(2025, 1, 2, 16, 5, 0));
        assert_eq!(recs[0].link, "https://ru.investing.com/news/1");

        // +0300 offset converted to GMT
        assert_eq!(recs[1].timestamp, at(2025, 1, 2, 16, 10, 0));
    }

    #[test]
    fn naive_dates_follow_feed_zone() {
        let got = parse_pub_date("2025-01-02 19:00:00", Zone::Moscow, Zone::Gmt).unwrap();
        assert_eq!(got, at(2025, 1, 2, 16, 0, 0));
        let kept = parse_pub_date("2025-01-02 19:00:00", Zone::Moscow, Zone::Moscow).unwrap();
        assert_eq!(kept, at(2025, 1, 2, 19, 0, 0));
        assert!(parse_pub_date("Нет даты публикации", Zone::Gmt, Zone::Gmt).is_none());
    }

    #[test]
    fn broken_xml_is_an_error() {
        assert!(parse_rss("<rss><channel><item>", Zone::Gmt, Zone::Gmt).is_err());
    }

    #[test]
    fn feed_without_items_is_empty() {
        let recs = parse_rss(
            "<rss><channel><title>t</title></channel></rss>",
            Zone::Gmt,
            Zone::Gmt,
        )
        .unwrap();
        assert!(recs.is_empty());
    }
}
