//! Widget specifications and view configuration.
//!
//! Specs arrive as pre-built JSON. Unknown variant tags, unknown fields and
//! out-of-range direction labels are rejected by the deserializer; `validate`
//! covers the structural rules serde can't express. Both run at load time so
//! a broken spec never reaches the renderer.

use chrono::DateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{Direction, Orientation, SpecError, TransAlign, Value};

/// A value taken from the current row or embedded in the widget config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum FieldOrLiteral {
    Field(String),
    Literal(Value),
}

/// A reference to an external query plus its parameter bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRef {
    pub id: String,
    /// Resolved against the context of the widget issuing the query.
    #[serde(default)]
    pub params: IndexMap<String, FieldOrLiteral>,
}

/// Where a `DataRows` widget gets its rows from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum QueryOrField {
    /// A list-valued field of the current row.
    Field(String),
    Query(QueryRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum WidgetSpec {
    Layout(LayoutSpec),
    /// Shared so pending resolutions can hold it without copying the subtree.
    DataRows(Arc<DataRowsSpec>),
    Text(TextSpec),
    Image(ImageSpec),
    PlayButton(PlayButtonSpec),
}

/// Children rendered against the same context, in a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSpec {
    pub direction: Direction,
    #[serde(default)]
    pub align: TransAlign,
    pub elements: Vec<WidgetSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataRowsSpec {
    pub data: QueryOrField,
    pub rows: RowsLayout,
    #[serde(default)]
    pub align: TransAlign,
}

/// How the rows of a `DataRows` widget are composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum RowsLayout {
    /// One widget per row, rows laid out in a line.
    List(ListRows),
    /// Each element becomes a cell; corresponding cells of different rows
    /// line up.
    Table(TableRows),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListRows {
    pub direction: Direction,
    pub widget: Box<WidgetSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableRows {
    pub orientation: Orientation,
    pub elements: Vec<WidgetSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    #[default]
    Ellipsize,
    Wrap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextSpec {
    pub data: FieldOrLiteral,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Makes the text navigable.
    #[serde(default)]
    pub link: Option<FieldOrLiteral>,
    /// Font size, in CSS units.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub size_mode: SizeMode,
    /// Maximum extent along the reading direction.
    #[serde(default)]
    pub size_max: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub align: TransAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSpec {
    pub data: FieldOrLiteral,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub align: TransAlign,
}

/// Field names handed to the playback collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayButtonSpec {
    /// Field holding the media file.
    pub file_field: String,
    /// Media type (ex `sunwet/1/audio`), from a field or fixed.
    pub media: FieldOrLiteral,
    #[serde(default)]
    pub name_field: Option<String>,
    #[serde(default)]
    pub album_field: Option<String>,
    #[serde(default)]
    pub artist_field: Option<String>,
    #[serde(default)]
    pub cover_field: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub align: TransAlign,
}

/// Kind of a view parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Text,
    Number,
    Bool,
    /// RFC 3339 string.
    Datetime,
}

impl ParamKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Text => matches!(value, Value::String(_)),
            ParamKind::Datetime => value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()),
            ParamKind::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            ParamKind::Bool => matches!(value, Value::Bool(_)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamKind::Text => "text",
            ParamKind::Number => "number",
            ParamKind::Bool => "bool",
            ParamKind::Datetime => "datetime",
        }
    }
}

/// A complete view: its root widget plus the parameters that seed the root
/// context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    pub id: String,
    pub name: String,
    pub root: WidgetSpec,
    #[serde(default)]
    pub parameters: Vec<(String, ParamKind)>,
    /// Show media controls alongside the view.
    #[serde(default)]
    pub media_controls: bool,
}

// =========================================================================
// Loading and validation
// =========================================================================

impl WidgetSpec {
    /// Parse and validate a widget tree.
    pub fn from_json(text: &str) -> Result<Self, SpecError> {
        let spec: WidgetSpec = serde_json::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check the structural rules serde doesn't enforce.
    pub fn validate(&self) -> Result<(), SpecError> {
        self.validate_at("root")
    }

    fn validate_at(&self, path: &str) -> Result<(), SpecError> {
        match self {
            WidgetSpec::Layout(layout) => {
                for (i, element) in layout.elements.iter().enumerate() {
                    element.validate_at(&format!("{}.elements[{}]", path, i))?;
                }
            }
            WidgetSpec::DataRows(rows) => {
                validate_source(&rows.data, &format!("{}.data", path))?;
                match &rows.rows {
                    RowsLayout::List(list) => {
                        list.widget.validate_at(&format!("{}.rows.widget", path))?;
                    }
                    RowsLayout::Table(table) => {
                        if table.elements.is_empty() {
                            return Err(SpecError::invalid(path, "table rows need at least one element"));
                        }
                        for (i, element) in table.elements.iter().enumerate() {
                            element.validate_at(&format!("{}.rows.elements[{}]", path, i))?;
                        }
                    }
                }
            }
            WidgetSpec::Text(text) => {
                validate_value(&text.data, &format!("{}.data", path))?;
                if let Some(link) = &text.link {
                    validate_value(link, &format!("{}.link", path))?;
                }
            }
            WidgetSpec::Image(image) => {
                validate_value(&image.data, &format!("{}.data", path))?;
            }
            WidgetSpec::PlayButton(button) => {
                validate_field_name(&button.file_field, &format!("{}.file_field", path))?;
                validate_value(&button.media, &format!("{}.media", path))?;
                let optional = [
                    ("name_field", &button.name_field),
                    ("album_field", &button.album_field),
                    ("artist_field", &button.artist_field),
                    ("cover_field", &button.cover_field),
                ];
                for (name, field) in optional {
                    if let Some(field) = field {
                        validate_field_name(field, &format!("{}.{}", path, name))?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl ViewConfig {
    pub fn from_json(text: &str) -> Result<Self, SpecError> {
        let view: ViewConfig = serde_json::from_str(text)?;
        view.validate()?;
        Ok(view)
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        for (i, (name, _)) in self.parameters.iter().enumerate() {
            validate_field_name(name, &format!("parameters[{}]", i))?;
        }
        self.root.validate()
    }
}

fn validate_field_name(name: &str, path: &str) -> Result<(), SpecError> {
    if name.is_empty() {
        return Err(SpecError::invalid(path, "field name is empty"));
    }
    Ok(())
}

fn validate_value(spec: &FieldOrLiteral, path: &str) -> Result<(), SpecError> {
    match spec {
        FieldOrLiteral::Field(name) => validate_field_name(name, path),
        FieldOrLiteral::Literal(_) => Ok(()),
    }
}

fn validate_source(spec: &QueryOrField, path: &str) -> Result<(), SpecError> {
    match spec {
        QueryOrField::Field(name) => validate_field_name(name, path),
        QueryOrField::Query(query) => {
            if query.id.is_empty() {
                return Err(SpecError::invalid(path, "query id is empty"));
            }
            for (name, param) in &query.params {
                validate_value(param, &format!("{}.params.{}", path, name))?;
            }
            Ok(())
        }
    }
}
