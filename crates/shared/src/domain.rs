use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(MovieId);

/// A movie as held by the client. Copies of what the inventory owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub name: String,
    pub year: i32,
    pub duration_minutes: u32,
}

impl MovieRecord {
    pub fn draft(&self) -> MovieDraft {
        MovieDraft {
            name: self.name.clone(),
            year: self.year,
            duration_minutes: self.duration_minutes,
        }
    }
}

/// Body of create and update calls; the server assigns ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDraft {
    pub name: String,
    pub year: i32,
    pub duration_minutes: u32,
}

impl MovieDraft {
    pub fn new(name: impl Into<String>, year: i32, duration_minutes: u32) -> Self {
        Self {
            name: name.into(),
            year,
            duration_minutes,
        }
    }

    pub fn with_name_suffix(mut self, suffix: &str) -> Self {
        self.name.push_str(suffix);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "carMovieYear")]
    Year,
    #[serde(rename = "carMovieName")]
    Name,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "id")]
    Id,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Year => "carMovieYear",
            SortField::Name => "carMovieName",
            SortField::Duration => "duration",
            SortField::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Value of the `sort` query parameter, e.g. `carMovieYear,desc`.
    pub fn query_value(&self) -> String {
        format!("{},{}", self.field.as_str(), self.direction.as_str())
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortOrder::default(),
        }
    }
}

impl PageRequest {
    pub fn first_page(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", self.sort.query_value()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_request_sorts_by_year_descending() {
        let pairs = PageRequest::default().query_pairs();
        assert_eq!(pairs[0], ("page", "0".to_string()));
        assert_eq!(pairs[1], ("size", "100".to_string()));
        assert_eq!(pairs[2], ("sort", "carMovieYear,desc".to_string()));
    }

    #[test]
    fn update_draft_appends_suffix_and_keeps_numbers() {
        let record = MovieRecord {
            id: MovieId(4),
            name: "Cars".to_string(),
            year: 2006,
            duration_minutes: 117,
        };
        let draft = record.draft().with_name_suffix(" (Actualizado)");
        assert_eq!(draft.name, "Cars (Actualizado)");
        assert_eq!(draft.year, 2006);
        assert_eq!(draft.duration_minutes, 117);
    }
}
