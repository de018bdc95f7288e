//! Picks the release that precedes a given version among a project's tags.
//!
//! Tags use Drupal's release naming: an optional core-compatibility prefix
//! (`8.x-`), a dotted version, and an optional pre-release suffix
//! (`-dev`, `-alpha1`, `-beta2`, `-rc1`).

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static CORE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.x-").expect("Invalid core prefix regex"));

static PRE_RELEASE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(alpha|beta|rc)(\d+)").expect("Invalid pre-release regex"));

const STABLE_WEIGHT: u64 = 1000;

#[derive(Debug)]
struct RankedTag<'a> {
    name: &'a str,
    prefix: &'a str,
    compare_value: &'a str,
    weight: u64,
}

impl<'a> RankedTag<'a> {
    fn new(name: &'a str) -> Self {
        let prefix = core_prefix(name);
        Self {
            name,
            prefix,
            compare_value: &name[prefix.len()..],
            weight: pre_release_weight(name),
        }
    }

    fn base(&self) -> &'a str {
        self.compare_value.split('-').next().unwrap_or_default()
    }
}

/// Returns the tag released right before `version`, if any.
///
/// A tag with the same core prefix is preferred over the immediate
/// predecessor in the sorted list.
pub fn find_previous_version<S: AsRef<str>>(version: &str, tags: &[S]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }

    let mut ranked: Vec<RankedTag<'_>> = tags.iter().map(|tag| RankedTag::new(tag.as_ref())).collect();
    ranked.sort_by(|a, b| match natural_cmp(a.base(), b.base()) {
        Ordering::Equal => a.weight.cmp(&b.weight),
        other => other,
    });

    let prefix = core_prefix(version);
    let stripped = &version[prefix.len()..];

    let same_prefix_index = if prefix.is_empty() {
        None
    } else {
        ranked
            .iter()
            .position(|tag| tag.compare_value == stripped && tag.prefix == prefix)
    };
    let current = same_prefix_index
        .or_else(|| ranked.iter().position(|tag| tag.compare_value == stripped))?;

    if current == 0 {
        return None;
    }

    if !prefix.is_empty()
        && let Some(tag) = ranked[..current].iter().rev().find(|tag| tag.prefix == prefix)
    {
        return Some(tag.name.to_string());
    }

    Some(ranked[current - 1].name.to_string())
}

fn core_prefix(name: &str) -> &str {
    CORE_PREFIX_RE.find(name).map(|m| m.as_str()).unwrap_or_default()
}

fn pre_release_weight(name: &str) -> u64 {
    let weight = if name.contains("-alpha") {
        100
    } else if name.contains("-beta") {
        200
    } else if name.contains("-rc") {
        300
    } else if name.contains("-dev") {
        50
    } else {
        STABLE_WEIGHT
    };
    let number = PRE_RELEASE_NUMBER_RE
        .captures(name)
        .and_then(|captures| captures[2].parse::<u64>().ok())
        .unwrap_or(0);
    weight + number
}

/// Compares digit runs numerically and everything else case-insensitively.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a).into_iter();
    let mut right = chunks(b).into_iter();
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Number(x)), Some(Chunk::Number(y))) => {
                let x = x.trim_start_matches('0');
                let y = y.trim_start_matches('0');
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Some(Chunk::Number(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Number(_))) => Ordering::Greater,
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => x.to_lowercase().cmp(&y.to_lowercase()),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

fn chunks(value: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (index, ch) in value.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match in_digits {
            Some(current) if current != is_digit => {
                out.push(chunk(&value[start..index], current));
                start = index;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(current) = in_digits {
        out.push(chunk(&value[start..], current));
    }
    out
}

fn chunk(value: &str, digits: bool) -> Chunk<'_> {
    if digits { Chunk::Number(value) } else { Chunk::Text(value) }
}
