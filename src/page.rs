//! Scanner for the server-rendered dashboard page
//!
//! Only the attributes the client depends on are read: `.favorite-card`
//! elements with `data-city`/`data-lat`/`data-lon`, the `temp-<name>`,
//! `desc-<name>` and `icon-<name>` elements of each card, and
//! `.flash-message` notices.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::state::{DashboardPage, FavoriteCard, FlashMessage};

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)\b([^>]*)>").expect("valid tag pattern")
    })
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("valid attribute pattern")
    })
}

/// One opening tag and the text that directly follows it
struct Tag<'a> {
    attrs: Vec<(&'a str, String)>,
    text: &'a str,
}

impl Tag<'_> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    fn text(&self) -> String {
        unescape(&collapse_whitespace(self.text))
    }
}

fn scan_tags(html: &str) -> Vec<Tag<'_>> {
    tag_pattern()
        .captures_iter(html)
        .map(|caps| {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let raw_attrs = caps.get(2).map_or("", |m| m.as_str());
            let attrs = attr_pattern()
                .captures_iter(raw_attrs)
                .filter_map(|a| {
                    let key = a.get(1)?.as_str();
                    let value = a.get(2).or_else(|| a.get(3)).map_or("", |m| m.as_str());
                    Some((key, unescape(value)))
                })
                .collect();
            let rest = &html[whole.end..];
            let text = rest.find('<').map_or(rest, |end| &rest[..end]);
            Tag { attrs, text }
        })
        .collect()
}

/// Read favorite cards and flash messages out of the dashboard HTML
pub fn scan_dashboard(html: &str) -> DashboardPage {
    let tags = scan_tags(html);

    let mut temps = HashMap::new();
    let mut descs = HashMap::new();
    let mut icons = HashMap::new();
    for tag in &tags {
        let Some(id) = tag.attr("id") else { continue };
        if let Some(name) = id.strip_prefix("temp-") {
            temps.insert(name.to_string(), tag.text());
        } else if let Some(name) = id.strip_prefix("desc-") {
            descs.insert(name.to_string(), tag.text());
        } else if let Some(name) = id.strip_prefix("icon-") {
            if let Some(src) = tag.attr("src") {
                icons.insert(name.to_string(), src.to_string());
            }
        }
    }

    let mut favorites: Vec<FavoriteCard> = Vec::new();
    let mut flashes = Vec::new();
    for tag in &tags {
        if tag.has_class("favorite-card") {
            match favorite_card(tag) {
                Some(mut card) => {
                    if favorites.iter().any(|c| c.city_name == card.city_name) {
                        continue;
                    }
                    card.temp_text = temps.get(&card.city_name).cloned().filter(|t| !t.is_empty());
                    card.desc_text = descs.get(&card.city_name).cloned().filter(|t| !t.is_empty());
                    card.icon_src = icons.get(&card.city_name).cloned();
                    favorites.push(card);
                }
                None => tracing::warn!(
                    attrs = ?tag.attrs,
                    "skipping favorite card without city identity"
                ),
            }
        } else if tag.has_class("flash-message") {
            let text = tag.text();
            if !text.is_empty() {
                flashes.push(FlashMessage {
                    category: flash_category(tag),
                    text,
                });
            }
        }
    }

    DashboardPage { favorites, flashes }
}

fn favorite_card(tag: &Tag<'_>) -> Option<FavoriteCard> {
    let city = tag.attr("data-city")?;
    let lat = tag.attr("data-lat")?.trim().parse().ok()?;
    let lon = tag.attr("data-lon")?.trim().parse().ok()?;
    if city.is_empty() {
        return None;
    }
    Some(FavoriteCard::new(city, lat, lon))
}

/// `alert-success` → `success`; defaults to `info`
fn flash_category(tag: &Tag<'_>) -> String {
    tag.classes()
        .find_map(|c| c.strip_prefix("alert-"))
        .unwrap_or("info")
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
