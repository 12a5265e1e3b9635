//! Schedule description: calendar metadata plus recurring meeting types.
//!
//! A schedule is loaded from YAML and validated in a single pass at the
//! input boundary. Anything the rest of the crate relies on (value ranges,
//! known timezones, month counts) is checked here, and the first problem is
//! reported with a field path such as `call_types[1].schedule.2025[3].topic`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;

use chrono::Weekday;
use chrono_tz::Tz;
use serde_yaml::Value;

use crate::error::{MeetcalError, MeetcalResult};

/// Highest number of entries a year may list (one per month).
pub const MONTHS_PER_YEAR: usize = 12;

/// What a single occurrence is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    /// No topic given; the event is titled with the meeting type's title.
    Absent,
    Text(String),
    /// The occurrence does not take place.
    Cancelled,
}

/// Per-month metadata for one occurrence of a meeting type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub topic: Topic,
    /// Reference document for the call, if any.
    pub doc: Option<String>,
}

impl Occurrence {
    pub fn new(topic: Topic) -> Self {
        Occurrence { topic, doc: None }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A recurring series of meetings on the Nth weekday of each month.
#[derive(Debug, Clone)]
pub struct MeetingType {
    pub title: String,
    /// 0 = Monday ... 6 = Sunday
    pub weekday: u8,
    /// 0-based: 2 means the third occurrence of `weekday` in the month.
    pub week_of_month: u8,
    pub hour: u32,
    pub minute: u32,
    /// Length of each meeting in minutes.
    pub duration: u32,
    pub timezone: Tz,
    /// Call URL, used as the event location.
    pub location: String,
    /// Year -> occurrences in month order (index 0 is January).
    pub schedule: BTreeMap<i32, Vec<Occurrence>>,
}

impl MeetingType {
    /// `weekday` as a chrono weekday (0 = Monday through 6 = Sunday).
    pub fn chrono_weekday(&self) -> MeetcalResult<Weekday> {
        Weekday::try_from(self.weekday).map_err(|_| {
            MeetcalError::malformed(
                "day_of_week",
                format!("expected 0 (Monday) to 6 (Sunday), found {}", self.weekday),
            )
        })
    }
}

/// Calendar-wide metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMeta {
    pub name: String,
    pub organization: String,
    /// Organization homepage; doubles as the namespace for event UIDs.
    pub homepage: String,
    pub summary: String,
}

impl CalendarMeta {
    /// PRODID of the generated calendar.
    pub fn product_id(&self) -> String {
        format!("-//{}//{}//EN", self.organization, self.homepage)
    }
}

/// A fully validated schedule description.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub meta: CalendarMeta,
    pub meeting_types: Vec<MeetingType>,
}

impl Schedule {
    /// Load and validate a schedule from a YAML file.
    pub fn load(path: &Path) -> MeetcalResult<Self> {
        if !path.exists() {
            return Err(MeetcalError::InputNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let schedule = Self::from_yaml_str(&content)?;

        tracing::info!(
            path = %path.display(),
            meeting_types = schedule.meeting_types.len(),
            "loaded schedule"
        );

        Ok(schedule)
    }

    pub fn from_yaml_str(content: &str) -> MeetcalResult<Self> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| MeetcalError::malformed("$", e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate a parsed YAML document.
    pub fn from_value(value: &Value) -> MeetcalResult<Self> {
        let root = Node::root(value);
        root.mapping()?;

        let meta = CalendarMeta {
            name: root.field("name")?.text()?,
            organization: root.field("organization")?.text()?,
            homepage: root.field("homepage")?.text()?,
            summary: root.field("summary")?.text()?,
        };

        let meeting_types = root
            .field("call_types")?
            .items()?
            .iter()
            .map(parse_meeting_type)
            .collect::<MeetcalResult<Vec<_>>>()?;

        Ok(Schedule {
            meta,
            meeting_types,
        })
    }
}

fn parse_meeting_type(node: &Node) -> MeetcalResult<MeetingType> {
    node.mapping()?;

    let timezone_node = node.field("timezone")?;
    let timezone_name = timezone_node.text()?;
    let timezone: Tz = timezone_name
        .parse()
        .map_err(|_| timezone_node.error(format!("unknown timezone '{timezone_name}'")))?;

    let schedule_node = node.field("schedule")?;
    let mut schedule = BTreeMap::new();
    for (key, entries) in schedule_node.mapping()? {
        let year_path = format!("{}.{}", schedule_node.path, render_key(key));
        let year = parse_year(key).ok_or_else(|| {
            MeetcalError::malformed(year_path.clone(), "expected a year between 1 and 9999")
        })?;

        let year_node = Node {
            value: entries,
            path: year_path,
        };
        let items = year_node.items()?;
        if items.len() > MONTHS_PER_YEAR {
            return Err(year_node.error(format!(
                "expected at most {MONTHS_PER_YEAR} entries, found {}",
                items.len()
            )));
        }

        let occurrences = items
            .iter()
            .map(parse_occurrence)
            .collect::<MeetcalResult<Vec<_>>>()?;
        schedule.insert(year, occurrences);
    }

    Ok(MeetingType {
        title: node.field("title")?.text()?,
        weekday: node.field("day_of_week")?.int_in(0..=6)? as u8,
        week_of_month: node.field("week_of_month")?.int_in(0..=4)? as u8,
        hour: node.field("hour")?.int_in(0..=23)? as u32,
        minute: node.field("minute")?.int_in(0..=59)? as u32,
        duration: node.field("duration")?.int_in(1..=u32::MAX as u64)? as u32,
        timezone,
        location: node.field("url")?.text()?,
        schedule,
    })
}

fn parse_occurrence(node: &Node) -> MeetcalResult<Occurrence> {
    match node.value {
        Value::Mapping(_) => {
            let topic = match node.optional("topic") {
                Some(topic) => parse_topic(&topic)?,
                None => Topic::Absent,
            };
            let doc = match node.optional("doc") {
                Some(doc) => Some(doc.scalar_text()?),
                None => None,
            };
            Ok(Occurrence { topic, doc })
        }
        _ => Ok(Occurrence::new(parse_topic(node)?)),
    }
}

fn parse_topic(node: &Node) -> MeetcalResult<Topic> {
    match node.value {
        Value::Null => Ok(Topic::Absent),
        Value::Bool(false) => Ok(Topic::Cancelled),
        Value::Bool(true) => Err(node.error("`true` is not a topic; use a string, null or false")),
        _ => {
            let text = node.scalar_text()?;
            if text.is_empty() {
                Ok(Topic::Absent)
            } else {
                Ok(Topic::Text(text))
            }
        }
    }
}

fn parse_year(key: &Value) -> Option<i32> {
    let year = match key {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (1..=9999).contains(&year).then_some(year as i32)
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => format!("{other:?}"),
    }
}

/// A YAML value together with its path in the document, for error reporting.
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Node {
            value,
            path: "$".to_string(),
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path == "$" {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn error(&self, message: impl Into<String>) -> MeetcalError {
        MeetcalError::malformed(self.path.clone(), message)
    }

    fn mapping(&self) -> MeetcalResult<&'a serde_yaml::Mapping> {
        self.value
            .as_mapping()
            .ok_or_else(|| self.error(format!("expected a mapping, found {}", Kind(self.value))))
    }

    /// Required key. Present-but-null counts as missing.
    fn field(&self, key: &str) -> MeetcalResult<Node<'a>> {
        self.optional(key).ok_or_else(|| {
            MeetcalError::malformed(self.child_path(key), "missing required key")
        })
    }

    fn optional(&self, key: &str) -> Option<Node<'a>> {
        let value = self.value.get(key)?;
        if value.is_null() {
            return None;
        }
        Some(Node {
            value,
            path: self.child_path(key),
        })
    }

    fn items(&self) -> MeetcalResult<Vec<Node<'a>>> {
        let seq = self
            .value
            .as_sequence()
            .ok_or_else(|| self.error(format!("expected a list, found {}", Kind(self.value))))?;
        Ok(seq
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{i}]", self.path),
            })
            .collect())
    }

    fn text(&self) -> MeetcalResult<String> {
        self.value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.error(format!("expected a string, found {}", Kind(self.value))))
    }

    /// A string or a number, rendered as text.
    fn scalar_text(&self) -> MeetcalResult<String> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(self.error(format!(
                "expected a string or number, found {}",
                Kind(other)
            ))),
        }
    }

    fn int_in(&self, range: RangeInclusive<u64>) -> MeetcalResult<u64> {
        let n = self.value.as_u64().ok_or_else(|| {
            self.error(format!(
                "expected a non-negative integer, found {}",
                Kind(self.value)
            ))
        })?;
        if !range.contains(&n) {
            return Err(self.error(format!(
                "{n} is out of range {}..={}",
                range.start(),
                range.end()
            )));
        }
        Ok(n)
    }
}

/// Short description of a YAML value's kind.
struct Kind<'a>(&'a Value);

impl fmt::Display for Kind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.0 {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Sequence(_) => "a list",
            Value::Mapping(_) => "a mapping",
            Value::Tagged(_) => "a tagged value",
        };
        f.write_str(kind)
    }
}
