//! Display-only table helpers: field-path lookup, sorting and the view model
//! consumed by the shared table template.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::columns::Column;
use crate::selection::Selection;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Field path plus direction, written `nom` or `-nom` in query strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Parses `field` / `-field`; blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (direction, field) = match raw.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest.trim()),
            None => (SortDirection::Asc, raw),
        };
        if field.is_empty() {
            None
        } else {
            Some(Self::new(field, direction))
        }
    }

    pub fn to_param(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("-{}", self.field),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Splits `a.b[0].c` (or `a.b.0.c`) into segments.
fn parse_path(path: &str) -> Option<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if !name.is_empty() {
            match name.parse::<usize>() {
                Ok(index) => segments.push(Segment::Index(index)),
                Err(_) => segments.push(Segment::Key(name)),
            }
        }
        while let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped.find(']')?;
            let index = stripped[..end].trim().parse::<usize>().ok()?;
            segments.push(Segment::Index(index));
            rest = &stripped[end + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }
    if segments.is_empty() { None } else { Some(segments) }
}

/// Resolves a dot-notation path inside a JSON value.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path)?;
    segments
        .iter()
        .try_fold(value, |current, segment| match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(*key),
            (Segment::Index(index), Value::Array(items)) => items.get(*index),
            (Segment::Index(index), Value::Object(map)) => map.get(&index.to_string()),
            _ => None,
        })
}

/// Case- and accent-insensitive key for French text: NFD with combining
/// marks dropped, ligatures expanded.
fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        match c {
            'œ' => key.push_str("oe"),
            'æ' => key.push_str("ae"),
            'ß' => key.push_str("ss"),
            other => key.push(other),
        }
    }
    key
}

/// Locale-style string comparison: primary on folded text, then raw text.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

// Values of different JSON types never compare by content.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        _ => 3,
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    type_rank(a)
        .cmp(&type_rank(b))
        .then_with(|| match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.total_cmp(&y)
            }
            (Value::String(x), Value::String(y)) => locale_cmp(x, y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => locale_cmp(&a.to_string(), &b.to_string()),
        })
}

/// Orders two optional values; missing values sort last in both directions.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    match (is_missing(a), is_missing(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let (Some(a), Some(b)) = (a, b) else {
                return Ordering::Equal;
            };
            let ordering = compare_present(a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Sorts typed records by the JSON representation of one of their fields.
/// Equal keys keep their input order.
pub fn sort_records<T: Serialize>(items: Vec<T>, sort: &SortSpec) -> Vec<T> {
    let mut keyed: Vec<(Option<Value>, T)> = items
        .into_iter()
        .map(|item| {
            let key = serde_json::to_value(&item)
                .ok()
                .and_then(|value| lookup(&value, &sort.field).cloned());
            (key, item)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(a.as_ref(), b.as_ref(), sort.direction));
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ColumnHeader {
    pub key: &'static str,
    pub header: &'static str,
    /// Current direction when the table is sorted on this column.
    pub sorted: Option<&'static str>,
    /// Query value that sorts on this column next.
    pub sort_param: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<String>,
    pub selected: bool,
}

/// View model for `includes/list.html`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
    pub all_selected: bool,
    pub selected_count: usize,
}

impl TableView {
    pub fn build<T>(
        rows: &[T],
        columns: &[Column<T>],
        id: fn(&T) -> i64,
        selection: &Selection,
        sort: Option<&SortSpec>,
    ) -> Self {
        let headers = columns
            .iter()
            .map(|column| {
                let current = sort.filter(|s| s.field == column.key);
                let next_direction = current
                    .map(|s| s.direction.toggled())
                    .unwrap_or_default();
                ColumnHeader {
                    key: column.key,
                    header: column.header,
                    sorted: current.map(|s| s.direction.as_str()),
                    sort_param: SortSpec::new(column.key, next_direction).to_param(),
                }
            })
            .collect();

        let visible: Vec<i64> = rows.iter().map(id).collect();
        let table_rows = rows
            .iter()
            .map(|row| {
                let row_id = id(row);
                TableRow {
                    id: row_id,
                    cells: columns.iter().map(|c| (c.value)(row)).collect(),
                    selected: selection.contains(row_id),
                }
            })
            .collect();

        Self {
            columns: headers,
            rows: table_rows,
            all_selected: selection.is_all_selected(&visible),
            selected_count: selection.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sort_params() {
        assert_eq!(
            SortSpec::parse("-centre.nom"),
            Some(SortSpec::new("centre.nom", SortDirection::Desc))
        );
        assert_eq!(SortSpec::parse("nom"), Some(SortSpec::new("nom", SortDirection::Asc)));
        assert_eq!(SortSpec::parse(" - "), None);
        assert_eq!(SortSpec::parse(""), None);
    }

    #[test]
    fn lookup_supports_dots_and_indices() {
        let value = json!({"centre": {"nom": "Nord"}, "sessions": [{"date": "a"}, {"date": "b"}]});
        assert_eq!(lookup(&value, "centre.nom"), Some(&json!("Nord")));
        assert_eq!(lookup(&value, "sessions[1].date"), Some(&json!("b")));
        assert_eq!(lookup(&value, "sessions.0.date"), Some(&json!("a")));
        assert_eq!(lookup(&value, "sessions[4].date"), None);
        assert_eq!(lookup(&value, "sessions[x]"), None);
        assert_eq!(lookup(&value, ""), None);
    }

    #[test]
    fn nulls_sort_last_ascending() {
        let rows = vec![json!({"v": null}), json!({"v": 5}), json!({"v": null}), json!({"v": 1})];
        let rows = sort_records(rows, &SortSpec::new("v", SortDirection::Asc));
        assert_eq!(
            rows,
            vec![json!({"v": 1}), json!({"v": 5}), json!({"v": null}), json!({"v": null})]
        );
    }

    #[test]
    fn nulls_sort_last_descending() {
        let rows = vec![json!({"v": null}), json!({"v": 5}), json!({}), json!({"v": 1})];
        let rows = sort_records(rows, &SortSpec::new("v", SortDirection::Desc));
        assert_eq!(rows[0], json!({"v": 5}));
        assert_eq!(rows[1], json!({"v": 1}));
        assert!(lookup(&rows[2], "v").is_none_or(Value::is_null));
        assert!(lookup(&rows[3], "v").is_none_or(Value::is_null));
    }

    #[test]
    fn strings_use_accent_insensitive_order() {
        let rows = vec![json!({"n": "Zoé"}), json!({"n": "élodie"}), json!({"n": "Emma"})];
        let rows = sort_records(rows, &SortSpec::new("n", SortDirection::Asc));
        let names: Vec<_> = rows.iter().map(|r| r["n"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["élodie", "Emma", "Zoé"]);
    }

    #[test]
    fn decomposed_accents_fold_like_precomposed_ones() {
        let rows = vec![json!({"n": "Emma"}), json!({"n": "e\u{301}lodie"})];
        let rows = sort_records(rows, &SortSpec::new("n", SortDirection::Asc));
        let names: Vec<_> = rows.iter().map(|r| r["n"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["e\u{301}lodie", "Emma"]);
        assert_eq!(collation_key("e\u{301}lodie"), collation_key("élodie"));
    }

    #[test]
    fn ligatures_sort_as_two_letters() {
        assert_eq!(collation_key("Œuf"), "oeuf");
        assert_eq!(collation_key("Æther"), "aether");

        let rows = vec![json!({"n": "Oeuvre"}), json!({"n": "Œuf"}), json!({"n": "Odile"})];
        let rows = sort_records(rows, &SortSpec::new("n", SortDirection::Asc));
        let names: Vec<_> = rows.iter().map(|r| r["n"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Odile", "Œuf", "Oeuvre"]);

        let rows = vec![json!({"n": "Azur"}), json!({"n": "Æther"}), json!({"n": "Adam"})];
        let rows = sort_records(rows, &SortSpec::new("n", SortDirection::Asc));
        let names: Vec<_> = rows.iter().map(|r| r["n"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Adam", "Æther", "Azur"]);
    }

    #[test]
    fn mixed_types_sort_without_panicking() {
        let rows: Vec<Value> = (0..400)
            .map(|i| match i % 5 {
                0 => json!({"v": (i * 37) % 101}),
                1 => json!({"v": format!("{}a", (i * 13) % 97)}),
                2 => json!({"v": i % 3 == 0}),
                3 => json!({"v": null}),
                _ => json!({"v": ((i * 7) % 53) as f64 / 2.0}),
            })
            .collect();

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sorted = sort_records(rows.clone(), &SortSpec::new("v", direction));
            assert_eq!(sorted.len(), 400);
            for pair in sorted.windows(2) {
                assert_ne!(
                    compare_values(lookup(&pair[0], "v"), lookup(&pair[1], "v"), direction),
                    Ordering::Greater
                );
            }
        }

        let asc = sort_records(rows, &SortSpec::new("v", SortDirection::Asc));
        let ranks: Vec<u8> = asc
            .iter()
            .map(|r| match &r["v"] {
                Value::Null => 4,
                other => type_rank(other),
            })
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(asc[0]["v"], json!(0));
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let rows = vec![
            json!({"k": 1, "tag": "a"}),
            json!({"k": 0, "tag": "b"}),
            json!({"k": 1, "tag": "c"}),
        ];
        let rows = sort_records(rows, &SortSpec::new("k", SortDirection::Desc));
        let tags: Vec<_> = rows.iter().map(|r| r["tag"].as_str().unwrap()).collect();
        assert_eq!(tags, vec!["a", "c", "b"]);
    }

    #[test]
    fn sorts_typed_records() {
        #[derive(Serialize, Debug, PartialEq)]
        struct Row {
            nom: &'static str,
            places: Option<u32>,
        }

        let rows = vec![
            Row { nom: "b", places: None },
            Row { nom: "a", places: Some(12) },
            Row { nom: "c", places: Some(3) },
        ];
        let sorted = sort_records(rows, &SortSpec::new("places", SortDirection::Asc));
        let names: Vec<_> = sorted.iter().map(|r| r.nom).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn table_view_marks_selection_and_sort() {
        struct Row {
            id: i64,
            nom: String,
        }
        fn row_id(row: &Row) -> i64 {
            row.id
        }
        let columns = [Column::new("nom", "Nom", |r: &Row| r.nom.clone())];
        let rows = vec![
            Row { id: 1, nom: "A".into() },
            Row { id: 2, nom: "B".into() },
        ];
        let mut selection = Selection::default();
        selection.toggle(2);

        let sort = SortSpec::new("nom", SortDirection::Asc);
        let view = TableView::build(&rows, &columns, row_id, &selection, Some(&sort));

        assert_eq!(view.columns[0].sorted, Some("asc"));
        assert_eq!(view.columns[0].sort_param, "-nom");
        assert!(!view.rows[0].selected);
        assert!(view.rows[1].selected);
        assert!(!view.all_selected);
        assert_eq!(view.rows[1].cells, vec!["B".to_string()]);
    }
}
