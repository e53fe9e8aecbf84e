use serde::Deserialize;

use crate::selection::SelectionAction;

#[derive(Debug, Deserialize)]
/// Selection change posted from a list table; `visible` repeats once per row.
pub struct SelectionForm {
    pub action: SelectionAction,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub visible: Vec<i64>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Bare `next` field of delete buttons placed on several pages.
#[derive(Debug, Default, Deserialize)]
pub struct NextForm {
    #[serde(default)]
    pub next: Option<String>,
}

/// Only same-site absolute paths are accepted as redirect targets.
pub fn safe_next(next: Option<&str>, fallback: &str) -> String {
    match next.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_visible_keys_are_collected() {
        let form: SelectionForm =
            serde_html_form::from_str("action=select_all&visible=3&visible=5&visible=8&next=%2Fdeclic%3Fpage%3D2")
                .unwrap();
        assert_eq!(form.action, SelectionAction::SelectAll);
        assert_eq!(form.visible, vec![3, 5, 8]);
        assert_eq!(form.next.as_deref(), Some("/declic?page=2"));
    }

    #[test]
    fn external_redirects_are_refused() {
        assert_eq!(safe_next(Some("/prepa?page=3"), "/"), "/prepa?page=3");
        assert_eq!(safe_next(Some("//evil.example"), "/prepa"), "/prepa");
        assert_eq!(safe_next(Some("https://evil.example"), "/prepa"), "/prepa");
        assert_eq!(safe_next(None, "/prepa"), "/prepa");
    }
}
