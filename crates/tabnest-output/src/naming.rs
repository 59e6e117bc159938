//! Element and attribute naming for columns and rows.

/// Suffix token and attribute name used when a name ends in `_id`.
pub const PRIMARY_ATTRIBUTE: &str = "id";
/// Attribute name used for every other name.
pub const ALTERNATE_ATTRIBUTE: &str = "value";
/// Row wrapper element when neither a row key nor a substitute applies.
pub const DEFAULT_ROW_TAG: &str = "row";

/// Names the serializer falls back on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNaming {
    pub primary_attribute: String,
    pub alternate_attribute: String,
    pub default_row_tag: String,
}

impl Default for TagNaming {
    fn default() -> Self {
        Self {
            primary_attribute: PRIMARY_ATTRIBUTE.to_string(),
            alternate_attribute: ALTERNATE_ATTRIBUTE.to_string(),
            default_row_tag: DEFAULT_ROW_TAG.to_string(),
        }
    }
}

impl TagNaming {
    /// [`split_tag`] with this naming's attribute names.
    pub fn split<'a>(&'a self, name: &'a str) -> (&'a str, &'a str) {
        split_tag(name, &self.primary_attribute, &self.alternate_attribute)
    }
}

/// Split a column name into `(element, attribute)`.
///
/// When the last `_`-separated segment equals `primary` and there is more
/// than one segment, the element is the name without that suffix and the
/// attribute is `primary`. Otherwise the element is the full name and the
/// attribute is `alternate`. Purely syntactic.
pub fn split_tag<'a>(name: &'a str, primary: &'a str, alternate: &'a str) -> (&'a str, &'a str) {
    match name.rsplit_once('_') {
        Some((element, suffix)) if suffix == primary => (element, primary),
        _ => (name, alternate),
    }
}
