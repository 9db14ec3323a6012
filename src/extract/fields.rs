use std::sync::LazyLock;

use regex::Regex;

use crate::models::JobDetails;

/// Longest summary we keep, in characters.
pub const SUMMARY_MAX_CHARS: usize = 1000;
/// Length of the summary taken when no sentence pattern matches.
const SUMMARY_FALLBACK_CHARS: usize = 200;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("field pattern should compile"))
        .collect()
}

static SUMMARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // one to three sentences
        r"(?im)^([^.]+(?:[.]+[^.]+){0,2}\.)",
        // a single 50-200 char line
        r"(?im)^(.{50,200}(?:[.]|$))",
    ])
});

static FUNCTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(?:Essential Functions|Responsibilities|Duties|Key Responsibilities|What You'll Do)[:]\s*((?:\s*[-•*]\s*[^\n]+\n*)+)",
        r"(?i)(?:\n\s*[-•*]\s*[^\n]+\n*){2,}",
    ])
});

static EDUCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)Education[^:]*:\s*([^\n\r•]*)",
        r"(?im)Qualifications[^:]*:\s*([^\n\r•]*)",
        r"(?im)(?:Bachelor|Master|PhD|degree)[^•\n.]+",
        r"(?im)Education(?:al)?\s+Requirements?:[^•\n.]+",
    ])
});

static EXPERIENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)Experience[^:]*:\s*([^\n\r•]*)",
        r"(?im)Requirements?[^:]*:\s*([^\n\r•]*)",
        r"(?im)\d+[+]?\s+years?(?:\s+of)?\s+experience[^•\n.]+",
        r"(?im)[Mm]inimum\s+(?:\d+|one|two|three|four|five)\s+years?[^•\n.]+",
    ])
});

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-•*]\s*([^\n]+)").expect("BULLET_RE should compile"));

/// Separator between bullets run together on one line ("- a - b").
static INLINE_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-•*]\s+").expect("INLINE_BULLET_RE should compile"));

/// Pull structured fields out of plain posting text.
///
/// Pure: the same text always yields the same details.
pub fn extract(text: &str) -> JobDetails {
    JobDetails {
        summary: summary(text),
        essential_functions: essential_functions(text),
        education: first_match(text, &EDUCATION_PATTERNS),
        experience: first_match(text, &EXPERIENCE_PATTERNS),
    }
}

/// Try each pattern in order; the first that matches decides the field.
///
/// Uses capture group 1 when the pattern has one, the whole match otherwise.
/// A winning match that trims to nothing leaves the field absent.
fn first_match(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| {
            let caps = re.captures(text)?;
            caps.get(1).or_else(|| caps.get(0))
        })
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn summary(text: &str) -> Option<String> {
    let found = first_match(text, &SUMMARY_PATTERNS).or_else(|| {
        let head: String = text
            .trim_start()
            .chars()
            .take(SUMMARY_FALLBACK_CHARS)
            .collect();
        Some(head.trim().to_string()).filter(|s| !s.is_empty())
    })?;

    Some(match found.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((cut, _)) => found[..cut].trim_end().to_string(),
        None => found,
    })
}

fn essential_functions(text: &str) -> Option<Vec<String>> {
    let block = FUNCTION_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(text)?;
        caps.get(1).or_else(|| caps.get(0))
    })?;

    // Bullets run together after the header ("Duties: - a - b") are only
    // split when the whole block sits on one line.
    let single_line = !block.as_str().trim().contains('\n');
    let items: Vec<String> = BULLET_RE
        .captures_iter(block.as_str())
        .filter_map(|caps| caps.get(1))
        .flat_map(|body| {
            if single_line {
                INLINE_BULLET_RE.split(body.as_str()).collect()
            } else {
                vec![body.as_str()]
            }
        })
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();

    if items.is_empty() {
        tracing::debug!("Bullet block matched but held no items");
        return None;
    }
    Some(items)
}
