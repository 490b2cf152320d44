//! Input grammar of the event log
//!
//! Each entry of a log is either a shorthand string (`"branch develop"`), a
//! single-key object (`{commit: {message: "..."}}`), or something else, which
//! the normalizer reports as unrecognized.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Init,
    Commit,
    Branch,
    Checkout,
    Merge,
    Tag,
    CreateFile,
    ChangeContent,
    Add,
    AppendContent,
}

/// Whether a kind's shorthand form takes an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shorthand {
    /// No shorthand string form exists
    None,
    /// The keyword alone, e.g. `"commit"`
    Bare,
    /// The keyword followed by an argument, e.g. `"branch develop"`
    WithArg,
}

impl EventKind {
    /// Recognition order for shorthand strings
    pub const PRECEDENCE: [EventKind; 10] = [
        EventKind::Init,
        EventKind::Commit,
        EventKind::Branch,
        EventKind::Checkout,
        EventKind::Merge,
        EventKind::Tag,
        EventKind::CreateFile,
        EventKind::ChangeContent,
        EventKind::Add,
        EventKind::AppendContent,
    ];

    /// Keyword used both as shorthand prefix and object key
    pub fn keyword(&self) -> &'static str {
        match self {
            EventKind::Init => "init",
            EventKind::Commit => "commit",
            EventKind::Branch => "branch",
            EventKind::Checkout => "checkout",
            EventKind::Merge => "merge",
            EventKind::Tag => "tag",
            EventKind::CreateFile => "create file",
            EventKind::ChangeContent => "change content",
            EventKind::Add => "add",
            EventKind::AppendContent => "append content",
        }
    }

    pub fn shorthand(&self) -> Shorthand {
        match self {
            EventKind::Init | EventKind::Commit | EventKind::Add => Shorthand::Bare,
            EventKind::Branch
            | EventKind::Checkout
            | EventKind::Merge
            | EventKind::Tag
            | EventKind::CreateFile => Shorthand::WithArg,
            EventKind::ChangeContent | EventKind::AppendContent => Shorthand::None,
        }
    }

    /// Whether the kind can be written as a keyed object
    pub fn has_object_form(&self) -> bool {
        !matches!(self, EventKind::Branch | EventKind::Checkout)
    }
}

/// A shorthand string split into its kind and (trimmed) argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShorthandEvent<'a> {
    pub kind: EventKind,
    pub arg: &'a str,
}

/// Recognize a shorthand string.
///
/// A keyword matches when the trimmed string equals it or continues with
/// whitespace after it. Returns `None` for strings no kind recognizes.
pub fn parse_shorthand(raw: &str) -> Option<ShorthandEvent<'_>> {
    let s = raw.trim();
    EventKind::PRECEDENCE
        .iter()
        .filter(|kind| kind.shorthand() != Shorthand::None)
        .find_map(|&kind| {
            let rest = s.strip_prefix(kind.keyword())?;
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return None;
            }
            Some(ShorthandEvent {
                kind,
                arg: rest.trim(),
            })
        })
}

/// Authorship fields an event may override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialCommitInfo {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitFields {
    #[serde(rename = "defaultBranch", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeFields {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub theirs: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagFields {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub annotated: bool,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileFields {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddFields {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppendFields {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "newLine", default)]
    pub new_line: bool,
}

/// YAML reads `content: 2` or `name: 1.0` as numbers; keep them as text
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        // Debug keeps the fraction: 1.0 stays "1.0"
        Scalar::Float(n) => format!("{:?}", n),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// `commit:` with no body in YAML decodes as null; treat it like `{}`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Object form of an event: a map with exactly one recognized key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventObject {
    #[serde(rename = "init", deserialize_with = "null_as_default")]
    Init(InitFields),
    #[serde(rename = "commit", deserialize_with = "null_as_default")]
    Commit(PartialCommitInfo),
    #[serde(rename = "merge", deserialize_with = "null_as_default")]
    Merge(MergeFields),
    #[serde(rename = "tag", deserialize_with = "null_as_default")]
    Tag(TagFields),
    #[serde(rename = "create file", deserialize_with = "null_as_default")]
    CreateFile(FileFields),
    #[serde(rename = "change content", deserialize_with = "null_as_default")]
    ChangeContent(FileFields),
    #[serde(rename = "add", deserialize_with = "null_as_default")]
    Add(AddFields),
    #[serde(rename = "append content", deserialize_with = "null_as_default")]
    AppendContent(AppendFields),
}

impl EventObject {
    pub fn kind(&self) -> EventKind {
        match self {
            EventObject::Init(_) => EventKind::Init,
            EventObject::Commit(_) => EventKind::Commit,
            EventObject::Merge(_) => EventKind::Merge,
            EventObject::Tag(_) => EventKind::Tag,
            EventObject::CreateFile(_) => EventKind::CreateFile,
            EventObject::ChangeContent(_) => EventKind::ChangeContent,
            EventObject::Add(_) => EventKind::Add,
            EventObject::AppendContent(_) => EventKind::AppendContent,
        }
    }

    /// Explain why an entry keyed by a known kind did not decode.
    ///
    /// Returns `None` for values that do not name exactly one known kind.
    pub fn rejection(value: &serde_json::Value) -> Option<(EventKind, String)> {
        let map = value.as_object()?;
        if map.len() != 1 {
            return None;
        }
        let key = map.keys().next()?;
        let kind = EventKind::PRECEDENCE
            .iter()
            .copied()
            .find(|kind| kind.keyword() == key)?;
        if !kind.has_object_form() {
            return Some((kind, "object form not supported, use the shorthand".to_string()));
        }
        serde_json::from_value::<EventObject>(value.clone())
            .err()
            .map(|e| (kind, e.to_string()))
    }
}

/// One entry of the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Shorthand(String),
    Object(EventObject),
    /// Anything that is neither a string nor a single recognized key
    Unrecognized(serde_json::Value),
}

impl From<&str> for Event {
    fn from(s: &str) -> Self {
        Event::Shorthand(s.to_string())
    }
}

impl From<EventObject> for Event {
    fn from(obj: EventObject) -> Self {
        Event::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_shorthand_with_argument() {
        let ev = parse_shorthand("branch   develop ").unwrap();
        assert_eq!(ev.kind, EventKind::Branch);
        assert_eq!(ev.arg, "develop");

        let ev = parse_shorthand("create file src/a.txt").unwrap();
        assert_eq!(ev.kind, EventKind::CreateFile);
        assert_eq!(ev.arg, "src/a.txt");
    }

    #[test]
    fn test_parse_shorthand_requires_word_boundary() {
        assert!(parse_shorthand("branches x").is_none());
        assert!(parse_shorthand("commits").is_none());
        assert_eq!(parse_shorthand("tag").unwrap().arg, "");
    }

    #[test]
    fn test_object_only_kinds_have_no_shorthand() {
        assert!(parse_shorthand("change content a.txt").is_none());
        assert!(parse_shorthand("append content a.txt").is_none());
    }

    #[test]
    fn test_event_deserializes_each_shape() {
        let log: Vec<Event> = serde_json::from_value(json!([
            "init",
            {"commit": {"message": "m", "name": "user1"}},
            {"create file": {"file": "a.txt"}},
            {"nope": {}},
            42
        ]))
        .unwrap();

        assert_eq!(log[0], Event::Shorthand("init".to_string()));
        match &log[1] {
            Event::Object(EventObject::Commit(info)) => {
                assert_eq!(info.message.as_deref(), Some("m"));
                assert_eq!(info.author.as_deref(), Some("user1"));
                assert_eq!(info.email, None);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            log[2],
            Event::Object(EventObject::CreateFile(FileFields {
                file: Some("a.txt".to_string()),
                content: None,
            }))
        );
        assert!(matches!(log[3], Event::Unrecognized(_)));
        assert!(matches!(log[4], Event::Unrecognized(_)));
    }

    #[test]
    fn test_scalar_fields_accept_numbers_and_bools() {
        let event: Event = serde_json::from_value(json!({"create file": {"file": 7, "content": true}})).unwrap();
        assert_eq!(
            event,
            Event::Object(EventObject::CreateFile(FileFields {
                file: Some("7".to_string()),
                content: Some("true".to_string()),
            }))
        );
    }

    #[test]
    fn test_rejection_names_the_kind() {
        let typo = json!({"merge": {"theirs": "develop", "auther": "x"}});
        assert!(matches!(
            serde_json::from_value::<Event>(typo.clone()).unwrap(),
            Event::Unrecognized(_)
        ));
        let (kind, reason) = EventObject::rejection(&typo).unwrap();
        assert_eq!(kind, EventKind::Merge);
        assert!(reason.contains("auther"), "{}", reason);

        assert_eq!(EventObject::rejection(&json!({"nope": {}})), None);
        assert_eq!(EventObject::rejection(&json!({"commit": {}, "tag": {}})), None);
        assert_eq!(EventObject::rejection(&json!(42)), None);
    }

    #[test]
    fn test_null_body_is_empty_object() {
        let log: Vec<Event> = serde_yaml::from_str("- commit:\n- add:\n").unwrap();
        assert_eq!(
            log[0],
            Event::Object(EventObject::Commit(PartialCommitInfo::default()))
        );
        assert_eq!(log[1], Event::Object(EventObject::Add(AddFields::default())));
    }

    #[test]
    fn test_event_deserializes_from_yaml() {
        let yaml = r#"
- init
- tag:
    name: v1.0
    annotated: true
- append content:
    file: a.txt
    content: more
    newLine: true
"#;
        let log: Vec<Event> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], Event::from("init"));
        match &log[1] {
            Event::Object(EventObject::Tag(tag)) => {
                assert_eq!(tag.name.as_deref(), Some("v1.0"));
                assert!(tag.annotated);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match &log[2] {
            Event::Object(obj) => assert_eq!(obj.kind(), EventKind::AppendContent),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
