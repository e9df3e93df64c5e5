//! Filename pattern compiler: turn templates like
//! `{meta.taken.date} {meta.taken.time:hhmmss}.jpg` into an anchored regex
//! and parse capture metadata out of matching filenames.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::types::FileMetadata;

struct TokenRule {
    path: &'static str,
    exp: &'static str,
    layout: &'static str,
}

/// Default rules for bare tokens, applied in order.
const TOKEN_RULES: &[TokenRule] = &[
    TokenRule {
        path: "meta.taken.date",
        exp: r"\d{4}-\d{2}-\d{2}",
        layout: "%Y-%m-%d",
    },
    TokenRule {
        path: "meta.taken.time",
        exp: r"\d{2}-\d{2}-\d{2}",
        layout: "%H-%M-%S",
    },
];

struct TokenFormat {
    specifier: &'static str,
    exp: &'static str,
    layout: &'static str,
}

const TIME_FORMATS: &[TokenFormat] = &[
    TokenFormat {
        specifier: "hh-mm-ss",
        exp: r"\d{2}-\d{2}-\d{2}",
        layout: "%H-%M-%S",
    },
    TokenFormat {
        specifier: "hhmmss",
        exp: r"\d{6}",
        layout: "%H%M%S",
    },
    TokenFormat {
        specifier: "hhmm",
        exp: r"\d{4}",
        layout: "%H%M",
    },
];

fn format_variants(token_path: &str) -> &'static [TokenFormat] {
    match token_path {
        "meta.taken.time" => TIME_FORMATS,
        _ => &[],
    }
}

/// Parse metadata from `filename` using a token pattern.
///
/// The pattern is compiled to a regex anchored at both ends and matched
/// against the full filename including extension. Tokens with a format
/// specifier expand first (one occurrence each), then bare tokens. Any
/// compile failure, non-match, or unparsable captured timestamp yields
/// `None`; a match that produces no `taken_time` also yields `None`.
pub fn parse_filename_pattern(filename: &str, pattern: &str) -> Option<FileMetadata> {
    let mut regex_pattern = pattern.to_string();
    // synthesized group name -> token path (group names cannot contain dots)
    let mut group_map: HashMap<String, String> = HashMap::new();
    let mut layout_map: HashMap<String, &'static str> = HashMap::new();

    let spec_re = Regex::new(r"\{([^}:]+):([^}]+)\}").ok()?;
    for caps in spec_re.captures_iter(pattern) {
        let full = &caps[0];
        let token_path = &caps[1];
        let specifier = &caps[2];
        if let Some(variant) = format_variants(token_path)
            .iter()
            .find(|v| v.specifier == specifier)
        {
            let group = token_path.replace('.', "_");
            regex_pattern =
                regex_pattern.replacen(full, &format!("(?P<{group}>{})", variant.exp), 1);
            layout_map.insert(token_path.to_string(), variant.layout);
            group_map.insert(group, token_path.to_string());
        }
    }

    for rule in TOKEN_RULES {
        let token = format!("{{{}}}", rule.path);
        if regex_pattern.contains(&token) {
            let group = rule.path.replace('.', "_");
            regex_pattern = regex_pattern.replace(&token, &format!("(?P<{group}>{})", rule.exp));
            group_map.insert(group, rule.path.to_string());
            layout_map.insert(rule.path.to_string(), rule.layout);
        }
    }

    // Duplicate tokens produce duplicate group names, which fail to compile;
    // such patterns simply never match.
    let re = Regex::new(&format!("^{regex_pattern}$")).ok()?;
    let caps = re.captures(filename)?;

    let mut groups: HashMap<String, String> = HashMap::new();
    for name in re.capture_names().flatten() {
        if let Some(m) = caps.name(name) {
            let key = group_map
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string());
            groups.insert(key, m.as_str().to_string());
        }
    }

    let mut meta = FileMetadata {
        extension: Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    };

    if let Some(date) = groups.get("meta.taken.date") {
        let date_layout = layout_map
            .get("meta.taken.date")
            .copied()
            .unwrap_or("%Y-%m-%d");
        let time = groups.get("meta.taken.time").map(|t| {
            (
                t.as_str(),
                layout_map
                    .get("meta.taken.time")
                    .copied()
                    .unwrap_or("%H-%M-%S"),
            )
        });
        meta.taken_time = parse_taken_time(date, date_layout, time);
    }

    meta.taken_time.is_some().then_some(meta)
}

fn parse_taken_time(
    date: &str,
    date_layout: &str,
    time: Option<(&str, &str)>,
) -> Option<DateTime<Local>> {
    match time {
        Some((t, time_layout)) => {
            let ndt = NaiveDateTime::parse_from_str(
                &format!("{date} {t}"),
                &format!("{date_layout} {time_layout}"),
            )
            .ok()?;
            Local.from_local_datetime(&ndt).earliest()
        }
        None => {
            let d = NaiveDate::parse_from_str(date, date_layout).ok()?;
            Local
                .from_local_datetime(&d.and_hms_opt(0, 0, 0)?)
                .earliest()
        }
    }
}
