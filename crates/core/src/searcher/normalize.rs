//! Text normalization helpers shared by every provider.
//!
//! All functions here are pure and total: bad input yields an empty or
//! neutral value, never an error.

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};
use serde::Serialize;
use std::fmt;

const BYTES_PER_GB: f64 = 1_073_741_824.0;

static INFO_HASH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)btih:([0-9a-f]{40}|[a-z2-7]{32})(?:[&#]|$)").unwrap()
});

static LOCALIZED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(ITA|ITALIAN|ITALIANO|MULTI|DUAL|MD|SUB[\s._-]?ITA|FORCED|AC3[\s._-]?ITA|DTS[\s._-]?ITA|CINEFILE|NOVARIP|MEM|ROBBYRS|IDN_CREW|PSO|BADASS)\b",
    )
    .unwrap()
});

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d[\d.,]*)\s*([TGMK])?i?B").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static EPISODE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)S(\d{1,2})E\d{1,2}").unwrap());

/// Video quality bucket derived from a release title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quality {
    #[serde(rename = "4K")]
    Uhd,
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "720p")]
    Hd,
    #[serde(rename = "480p")]
    Sd480,
    #[serde(rename = "SD")]
    Sd,
}

impl Quality {
    /// Label used in stream names and binge groups.
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Uhd => "4K",
            Quality::FullHd => "1080p",
            Quality::Hd => "720p",
            Quality::Sd480 => "480p",
            Quality::Sd => "SD",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Strip quotes and symbols from a title, collapsing whitespace.
///
/// Kept characters: ASCII letters and digits, whitespace, `-`, `.`, `[`, `]`.
/// Quote-like characters vanish; anything else becomes a space.
pub fn clean_title(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .filter(|c| !matches!(c, ':' | '"' | '\'' | '\u{2019}'))
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '.' | '[' | ']')
            {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the BitTorrent info hash from a magnet URI.
///
/// Accepts a 40-char hex or 32-char base32 `btih` value and returns it
/// uppercased. Tracker and display-name parameters do not affect the result.
pub fn extract_info_hash(magnet: &str) -> Option<String> {
    INFO_HASH_RE
        .captures(magnet)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

/// Classify a title into a quality bucket. First matching rule wins.
pub fn classify_quality(title: &str) -> Quality {
    let t = title.to_lowercase();
    if t.contains("2160p") || t.contains("4k") || t.contains("uhd") {
        Quality::Uhd
    } else if t.contains("1080p") {
        Quality::FullHd
    } else if t.contains("720p") {
        Quality::Hd
    } else if t.contains("480p") || t.contains("sd") {
        Quality::Sd480
    } else {
        Quality::Sd
    }
}

/// Whether a title carries an Italian / dubbed / multi-audio marker.
pub fn is_localized(title: &str) -> bool {
    LOCALIZED_RE.is_match(title)
}

/// Parse a human-readable size ("1.5 GB", "700 MiB", "2,3 GB") into bytes.
///
/// Units are binary. Text without a recognizable `<number> [unit]B` yields 0.
pub fn parse_size(size_text: &str) -> u64 {
    let Some(caps) = SIZE_RE.captures(size_text) else {
        return 0;
    };

    let number = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let Some(value) = parse_decimal(number) else {
        return 0;
    };

    let multiplier: f64 = match caps
        .get(2)
        .map(|m| m.as_str().to_ascii_uppercase())
        .as_deref()
    {
        Some("T") => 1024f64.powi(4),
        Some("G") => 1024f64.powi(3),
        Some("M") => 1024f64.powi(2),
        Some("K") => 1024.0,
        _ => 1.0,
    };

    (value * multiplier).round() as u64
}

/// Render a byte count as `<n>.nn GB`, binary units.
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

/// Re-render scraped size text in the [`format_size`] shape.
///
/// Unrecognized text is kept, trimmed.
pub fn normalize_size(size_text: &str) -> String {
    match parse_size(size_text) {
        0 => size_text.trim().to_string(),
        bytes => format_size(bytes),
    }
}

/// Parse "1.5" / "1,5" / "1.234.5" the lenient way: first comma is the
/// decimal separator, anything past a second separator is ignored.
fn parse_decimal(number: &str) -> Option<f64> {
    let normalized = number.replacen(',', ".", 1);
    let mut parts = normalized.split('.');
    let int_part = parts.next().unwrap_or_default();
    let frac_part: String = parts
        .next()
        .unwrap_or_default()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    let text = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    };
    text.parse().ok()
}

/// Build a magnet URI from an info hash, display name and tracker list.
///
/// Trackers appear as `tr=` parameters in the given order.
pub fn build_magnet(info_hash: &str, display_name: &str, trackers: &[String]) -> String {
    let mut magnet = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        info_hash,
        urlencoding::encode(display_name)
    );
    for tracker in trackers {
        magnet.push_str("&tr=");
        magnet.push_str(&urlencoding::encode(tracker));
    }
    magnet
}

/// Find a release year (1900-2099) in a query.
pub fn extract_year(query: &str) -> Option<u16> {
    YEAR_RE.find(query).and_then(|m| m.as_str().parse().ok())
}

/// Rewrite an `SxxEyy` episode marker as `Stagione N`.
///
/// Italian-curated indexes list season packs that way, and searching for
/// a single episode code there finds nothing.
pub fn season_query(query: &str) -> String {
    EPISODE_MARKER_RE
        .replace(query, |caps: &Captures| {
            let season: u32 = caps[1].parse().unwrap_or(0);
            format!("Stagione {}", season)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_strips_quotes_and_symbols() {
        assert_eq!(clean_title("L'Arte: della \"Gioia\""), "LArte della Gioia");
        assert_eq!(clean_title("Movie (2024) [1080p]"), "Movie 2024 [1080p]");
        assert_eq!(clean_title("It\u{2019}s   a   Test!!"), "Its a Test");
        assert_eq!(clean_title("Città.Ita-Eng"), "Citt .Ita-Eng");
    }

    #[test]
    fn test_clean_title_empty() {
        assert_eq!(clean_title(""), "");
        assert_eq!(clean_title("   \t "), "");
        assert_eq!(clean_title("@@@"), "");
    }

    #[test]
    fn test_extract_info_hash_hex() {
        let magnet = "magnet:?xt=urn:btih:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA&dn=Movie.2024.1080p.ITA";
        assert_eq!(
            extract_info_hash(magnet).as_deref(),
            Some("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
        );
    }

    #[test]
    fn test_extract_info_hash_uppercases_lowercase_hex() {
        let magnet = "magnet:?xt=urn:btih:a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";
        assert_eq!(
            extract_info_hash(magnet).as_deref(),
            Some("A94A8FE5CCB19BA61C4C0873D391E987982FBBD3")
        );
    }

    #[test]
    fn test_extract_info_hash_base32() {
        let hash = "BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB";
        let magnet = format!("magnet:?xt=urn:btih:{}&tr=udp%3A%2F%2Fexample", hash.to_lowercase());
        assert_eq!(extract_info_hash(&magnet).as_deref(), Some(hash));
    }

    #[test]
    fn test_extract_info_hash_ignores_trailing_params() {
        let a = "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567&dn=One";
        let b = "magnet:?xt=urn:btih:0123456789ABCDEF0123456789ABCDEF01234567&dn=Two&tr=x";
        assert_eq!(extract_info_hash(a), extract_info_hash(b));
    }

    #[test]
    fn test_extract_info_hash_malformed() {
        assert_eq!(extract_info_hash(""), None);
        assert_eq!(extract_info_hash("magnet:?xt=urn:btih:&dn=x"), None);
        assert_eq!(extract_info_hash("magnet:?xt=urn:btih:12345&dn=x"), None);
        // 39 hex chars is neither a hex nor a base32 hash
        assert_eq!(
            extract_info_hash("magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef0123456"),
            None
        );
        assert_eq!(extract_info_hash("https://example.com/torrent/1"), None);
    }

    #[test]
    fn test_classify_quality() {
        assert_eq!(classify_quality("Movie.2024.1080p.ITA"), Quality::FullHd);
        assert_eq!(classify_quality("Movie 2160p HDR"), Quality::Uhd);
        assert_eq!(classify_quality("Movie 4K"), Quality::Uhd);
        assert_eq!(classify_quality("Movie UHD BluRay"), Quality::Uhd);
        assert_eq!(classify_quality("Movie 720p"), Quality::Hd);
        assert_eq!(classify_quality("Movie 480p"), Quality::Sd480);
        assert_eq!(classify_quality("Movie DVDRip"), Quality::Sd);
    }

    #[test]
    fn test_classify_quality_priority() {
        // 4K rule is checked before 1080p
        assert_eq!(classify_quality("Movie 2160p 1080p"), Quality::Uhd);
        // "sd" substring maps to 480p
        assert_eq!(classify_quality("Movie SDTV"), Quality::Sd480);
    }

    #[test]
    fn test_classify_quality_empty() {
        assert_eq!(classify_quality(""), Quality::Sd);
    }

    #[test]
    fn test_quality_labels() {
        assert_eq!(Quality::Uhd.to_string(), "4K");
        assert_eq!(Quality::FullHd.label(), "1080p");
        assert_eq!(Quality::Sd.label(), "SD");
        assert_eq!(serde_json::to_string(&Quality::Hd).unwrap(), "\"720p\"");
    }

    #[test]
    fn test_is_localized() {
        assert!(is_localized("Movie.2024.1080p.ITA.ENG"));
        assert!(is_localized("Movie 2024 iTALiAN"));
        assert!(is_localized("Show S01 SUB-ITA"));
        assert!(is_localized("Show S01 SUBITA"));
        assert!(is_localized("Movie AC3 ITA"));
        assert!(is_localized("Movie [MULTI]"));
        assert!(is_localized("Movie 1080p CINEFILE"));
        assert!(is_localized("Movie IDN_CREW"));
    }

    #[test]
    fn test_is_localized_whole_word_only() {
        assert!(!is_localized("Movie 2024 1080p ENG"));
        assert!(!is_localized("Italia Express"));
        assert!(!is_localized("Multiverse"));
        assert!(!is_localized(""));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1.5 GB"), 1610612736);
        assert_eq!(parse_size("1,5 GB"), 1610612736);
        assert_eq!(parse_size("700 MiB"), 734003200);
        assert_eq!(parse_size("1 KB"), 1024);
        assert_eq!(parse_size("2 TB"), 2 * 1024u64.pow(4));
        assert_eq!(parse_size("512 B"), 512);
        assert_eq!(parse_size("1.5GB"), 1610612736);
    }

    #[test]
    fn test_normalize_size() {
        assert_eq!(normalize_size("1.5 GB"), "1.50 GB");
        assert_eq!(normalize_size(" 700 MiB "), "0.68 GB");
        assert_eq!(normalize_size("2,3 GB"), "2.30 GB");
        assert_eq!(normalize_size("n/a"), "n/a");
        assert_eq!(format_size(0), "0.00 GB");
    }

    #[test]
    fn test_parse_size_unrecognized() {
        assert_eq!(parse_size(""), 0);
        assert_eq!(parse_size("unknown"), 0);
        assert_eq!(parse_size("1234"), 0);
    }

    #[test]
    fn test_build_magnet() {
        let trackers = vec![
            "udp://tracker.one:1337/announce".to_string(),
            "udp://tracker.two:80/announce".to_string(),
        ];
        let magnet = build_magnet("ABCDEF", "My Movie 2024", &trackers);
        assert_eq!(
            magnet,
            "magnet:?xt=urn:btih:ABCDEF&dn=My%20Movie%202024\
             &tr=udp%3A%2F%2Ftracker.one%3A1337%2Fannounce\
             &tr=udp%3A%2F%2Ftracker.two%3A80%2Fannounce"
        );
    }

    #[test]
    fn test_build_magnet_without_trackers() {
        let magnet = build_magnet("ABC", "x", &[]);
        assert_eq!(magnet, "magnet:?xt=urn:btih:ABC&dn=x");
    }

    #[test]
    fn test_build_magnet_hash_round_trips() {
        let hash = "0123456789ABCDEF0123456789ABCDEF01234567";
        let magnet = build_magnet(hash, "Name", &["udp://t".to_string()]);
        assert_eq!(extract_info_hash(&magnet).as_deref(), Some(hash));
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("The Matrix 1999"), Some(1999));
        assert_eq!(extract_year("Dune Part Two 2024"), Some(2024));
        assert_eq!(extract_year("Blade Runner 2049"), Some(2049));
        assert_eq!(extract_year("Movie 1899"), None);
        assert_eq!(extract_year("Movie 20245"), None);
        assert_eq!(extract_year("Movie"), None);
    }

    #[test]
    fn test_season_query() {
        assert_eq!(season_query("Breaking Bad S01E02"), "Breaking Bad Stagione 1");
        assert_eq!(season_query("Dark s03e10"), "Dark Stagione 3");
        assert_eq!(season_query("The Office S10E01"), "The Office Stagione 10");
        assert_eq!(season_query("No Marker"), "No Marker");
    }
}
