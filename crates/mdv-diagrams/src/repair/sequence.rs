//! Sequence diagram repair.
//!
//! Sub-passes run in a fixed order: reserved participant identifiers are
//! renamed first, then their uses in message lines, then message and note
//! text is quoted.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::ReservedWordSet;

/// Message arrows, longest alternatives first.
const ARROW: &str = r"<<--?>>|--?>>|--?>|--?[x)]";

/// Characters that break Mermaid's message text parser.
const MESSAGE_TRIGGERS: &[char] = &['(', ')', '{', '}', '[', ']', '<', '>'];

/// Characters that break Mermaid's note text parser.
const NOTE_TRIGGERS: &[char] = &['(', ')', '{', '}', '[', ']', '<', '>', '&', ';', '#'];

static PARTICIPANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^([ \t]*(?:participant|actor)[ \t]+)(\w+)([ \t]+as[ \t]+.*)$").unwrap()
});

static SENDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^([ \t]*)(\w+)([ \t]*(?:{ARROW}))")).unwrap());

static RECEIVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^([ \t]*\w+[ \t]*(?:{ARROW})[ \t]*[+-]?[ \t]*)(\w+)([ \t]*:)"
    ))
    .unwrap()
});

static MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^([ \t]*\w+[ \t]*(?:{ARROW})[ \t]*[+-]?[ \t]*\w+[ \t]*:)[ \t]*(.*?)([ \t\r]*)$"
    ))
    .unwrap()
});

static NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^([ \t]*Note[ \t]+(?:left|right|over)[ \t]+[\w, \t]+:)[ \t]*(.*?)([ \t\r]*)$")
        .unwrap()
});

pub(crate) fn repair_sequence(source: &str, reserved: &ReservedWordSet) -> String {
    let renamed = rename_reserved_participants(source, reserved);
    let referenced = rename_reserved_references(&renamed, reserved);
    let messages = quote_message_text(&referenced);
    quote_note_text(&messages).into_owned()
}

/// Append `_` to the identifier captured in group 2 when it is reserved.
fn suffix_reserved(caps: &Captures<'_>, reserved: &ReservedWordSet) -> String {
    let id = &caps[2];
    if reserved.contains(id) {
        format!("{}{id}_{}", &caps[1], &caps[3])
    } else {
        caps[0].to_owned()
    }
}

/// `participant end as End` becomes `participant end_ as End`.
fn rename_reserved_participants<'a>(source: &'a str, reserved: &ReservedWordSet) -> Cow<'a, str> {
    PARTICIPANT.replace_all(source, |caps: &Captures<'_>| suffix_reserved(caps, reserved))
}

/// Rename reserved identifiers used as message sender or receiver.
///
/// The matched casing is kept so references stay consistent with the
/// renamed declaration.
fn rename_reserved_references<'a>(source: &'a str, reserved: &ReservedWordSet) -> Cow<'a, str> {
    let senders = SENDER.replace_all(source, |caps: &Captures<'_>| suffix_reserved(caps, reserved));
    let receivers =
        match RECEIVER.replace_all(&senders, |caps: &Captures<'_>| suffix_reserved(caps, reserved)) {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
    receivers.map_or(senders, Cow::Owned)
}

fn is_fully_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// Wrap message text containing bracket characters in double quotes.
///
/// Inner double quotes become single quotes.
fn quote_message_text(source: &str) -> Cow<'_, str> {
    MESSAGE.replace_all(source, |caps: &Captures<'_>| {
        let text = &caps[2];
        if is_fully_quoted(text) || !text.contains(MESSAGE_TRIGGERS) {
            return caps[0].to_owned();
        }
        format!("{} \"{}\"{}", &caps[1], text.replace('"', "'"), &caps[3])
    })
}

/// Wrap note text containing special characters in double quotes.
///
/// Inner double quotes are backslash-escaped, unlike message text.
fn quote_note_text(source: &str) -> Cow<'_, str> {
    NOTE.replace_all(source, |caps: &Captures<'_>| {
        let text = &caps[2];
        if is_fully_quoted(text) || !text.contains(NOTE_TRIGGERS) {
            return caps[0].to_owned();
        }
        format!("{} \"{}\"{}", &caps[1], text.replace('"', "\\\""), &caps[3])
    })
}
