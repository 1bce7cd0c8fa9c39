//! Approver normalization
//!
//! Each item carries an unordered list of (role, action) pairs. The
//! action token encodes an approval category and an optional priority:
//! `"I1"` = inform at priority 1, `"R"` = review with no explicit
//! priority, `"EX*"` = execute with the delegation star. This module
//! parses those tokens and produces the deduplicated, deterministically
//! ordered list the UI renders per node. Everything here is pure.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::ApproverEntry;

/// Standard action token: one category letter, optional explicit
/// priority digits. Star marker is stripped before matching.
static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([IREXN])([0-9]*)$").unwrap());

/// First run of digits anywhere, for best-effort level extraction on
/// non-conforming tokens.
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Priority assigned to same-group tokens with no explicit digits; they
/// sort after every explicitly-numbered token in their group.
const IMPLICIT_LEVEL: u32 = 100;

/// Priority for tokens whose level cannot be determined at all.
const UNPARSEABLE_LEVEL: u32 = 999;

/// Approval category, in display precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionGroup {
    /// I - informed before the decision
    Inform,
    /// R - reviews the request
    Review,
    /// E - endorses (EX is the execute-endorsement special form)
    Endorse,
    /// X - executes
    Execute,
    /// N - notified after the fact
    Notify,
    /// Anything unrecognizable; sorts with Notify, last
    Unknown,
}

impl ActionGroup {
    fn from_letter(letter: char) -> Self {
        match letter {
            'I' => ActionGroup::Inform,
            'R' => ActionGroup::Review,
            'E' => ActionGroup::Endorse,
            'X' => ActionGroup::Execute,
            'N' => ActionGroup::Notify,
            _ => ActionGroup::Unknown,
        }
    }

    /// Sort precedence: I=0, R=1, E=2, X=3, N=4; unknown sorts with N.
    pub fn precedence(&self) -> u8 {
        match self {
            ActionGroup::Inform => 0,
            ActionGroup::Review => 1,
            ActionGroup::Endorse => 2,
            ActionGroup::Execute => 3,
            ActionGroup::Notify | ActionGroup::Unknown => 4,
        }
    }
}

/// Parsed action token. `display` is the normalized redisplay form
/// (`"ex1 "` becomes `"EX1"`, star preserved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionToken {
    pub group: ActionGroup,
    pub level: u32,
    pub display: String,
    pub has_star: bool,
}

/// Parse one raw action string. Pure and stateless; never fails, every
/// malformed input maps to a defined fallback token.
pub fn parse_action_token(raw: &str) -> ActionToken {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let upper = stripped.to_uppercase();
    let has_star = upper.contains('*');
    let bare = upper.replace('*', "");
    let star = if has_star { "*" } else { "" };

    if bare.is_empty() {
        return ActionToken {
            group: ActionGroup::Unknown,
            level: UNPARSEABLE_LEVEL,
            display: String::new(),
            has_star: false,
        };
    }

    // "EX" is the one two-letter form: execute-endorsement at a fixed
    // high precedence within group E.
    if bare == "EX" {
        return ActionToken {
            group: ActionGroup::Endorse,
            level: 10,
            display: format!("EX{}", star),
            has_star,
        };
    }

    if let Some(caps) = ACTION_RE.captures(&bare) {
        let letter = caps[1].chars().next().unwrap_or('Z');
        let digits = &caps[2];
        let level = if digits.is_empty() {
            IMPLICIT_LEVEL
        } else {
            digits.parse().unwrap_or(UNPARSEABLE_LEVEL)
        };
        return ActionToken {
            group: ActionGroup::from_letter(letter),
            level,
            display: format!("{}{}{}", letter, digits, star),
            has_star,
        };
    }

    // Non-conforming token: best-effort group and level, original
    // (whitespace-stripped) string passed through as the display form.
    let group = bare
        .chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map(ActionGroup::from_letter)
        .unwrap_or(ActionGroup::Unknown);
    let level = DIGITS_RE
        .find(&bare)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(UNPARSEABLE_LEVEL);
    ActionToken {
        group,
        level,
        display: upper,
        has_star,
    }
}

/// Deduplicate and order one node's approver list for display.
///
/// Dedup key is the collapsed role plus the star-stripped token; the
/// first occurrence wins and later duplicates drop silently (the same
/// role listed twice is one real approval requirement, not an error).
/// Order: group precedence, then level ascending, then non-starred
/// before starred, stable on input position. Output entries keep the
/// role verbatim and carry the normalized token as `action`.
pub fn normalize_approvers(entries: &[ApproverEntry]) -> Vec<ApproverEntry> {
    let mut seen = std::collections::HashSet::new();
    let mut parsed: Vec<(ActionToken, &ApproverEntry)> = Vec::with_capacity(entries.len());

    for entry in entries {
        let token = parse_action_token(&entry.action);
        let key = format!("{}|{}", collapse_role(&entry.role), token.display.replace('*', ""));
        if seen.insert(key) {
            parsed.push((token, entry));
        }
    }

    parsed.sort_by_key(|(token, _)| (token.group.precedence(), token.level, token.has_star));

    parsed
        .into_iter()
        .map(|(token, entry)| ApproverEntry {
            role: entry.role.clone(),
            action: token.display,
        })
        .collect()
}

/// Lower-cased role with runs of whitespace collapsed to single spaces.
fn collapse_role(role: &str) -> String {
    role.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
