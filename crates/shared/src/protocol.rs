use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{MovieDraft, MovieId, MovieRecord};

/// A movie as the inventory API serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieWire {
    pub id: i64,
    #[serde(rename = "carMovieName")]
    pub name: String,
    #[serde(rename = "carMovieYear")]
    pub year: i32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub duration: u32,
}

/// The inventory sends `null` for movies stored without a duration.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<MovieWire> for MovieRecord {
    fn from(value: MovieWire) -> Self {
        Self {
            id: MovieId(value.id),
            name: value.name,
            year: value.year,
            duration_minutes: value.duration,
        }
    }
}

impl From<&MovieRecord> for MovieWire {
    fn from(value: &MovieRecord) -> Self {
        Self {
            id: value.id.0,
            name: value.name.clone(),
            year: value.year,
            duration: value.duration_minutes,
        }
    }
}

/// Create/update body. The id travels in the path, never in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDraftWire {
    #[serde(rename = "carMovieName")]
    pub name: String,
    #[serde(rename = "carMovieYear")]
    pub year: i32,
    pub duration: u32,
}

impl From<&MovieDraft> for MovieDraftWire {
    fn from(value: &MovieDraft) -> Self {
        Self {
            name: value.name.clone(),
            year: value.year,
            duration: value.duration_minutes,
        }
    }
}

impl From<MovieDraftWire> for MovieDraft {
    fn from(value: MovieDraftWire) -> Self {
        Self {
            name: value.name,
            year: value.year,
            duration_minutes: value.duration,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoviesPage {
    #[serde(rename = "Movies", default)]
    pub movies: Vec<MovieWire>,
}

/// Controls that can fire a dashboard action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    AddButton,
    UpdateButton,
    DeleteButton,
    ViewButton,
    SearchInput,
}

impl Control {
    pub fn as_str(self) -> &'static str {
        match self {
            Control::AddButton => "add_button",
            Control::UpdateButton => "update_button",
            Control::DeleteButton => "delete_button",
            Control::ViewButton => "view_button",
            Control::SearchInput => "search_input",
        }
    }
}

/// One fired control. Lower `sequence` fired earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub control: Control,
    #[serde(default)]
    pub sequence: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Trigger {
    pub fn new(control: Control, sequence: u64) -> Self {
        Self {
            control,
            sequence,
            query: None,
        }
    }

    pub fn search(sequence: u64, query: impl Into<String>) -> Self {
        Self {
            control: Control::SearchInput,
            sequence,
            query: Some(query.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub selected_rows: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub selected_rows: Vec<usize>,
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient outcome of the last action, shown next to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub id: String,
}

pub fn table_columns() -> Vec<ColumnSpec> {
    [
        ("ID", "id"),
        ("Nombre", "carMovieName"),
        ("Año", "carMovieYear"),
        ("Duración (min)", "duration"),
    ]
    .into_iter()
    .map(|(name, id)| ColumnSpec {
        name: name.to_string(),
        id: id.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<MovieWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}
