use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::record::{ContentRecord, Facet};
use super::validation::{NumberValidator, StringValidator, ValidationError, Validator};

/// 电影记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub status: Option<String>, // "Released", "In Production", ...
    pub year: Option<i32>,
    pub siddu_score: Option<f32>, // 0-10
    pub popularity: Option<f64>,
    pub poster_url: Option<String>,
}

impl Movie {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            director: None,
            cast: Vec::new(),
            genres: Vec::new(),
            country: None,
            language: None,
            status: None,
            year: None,
            siddu_score: None,
            popularity: None,
            poster_url: None,
        }
    }
}

impl ContentRecord for Movie {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn facet_values(&self, facet: Facet) -> Vec<Cow<'_, str>> {
        match facet {
            Facet::Genre => self.genres.iter().map(|g| Cow::Borrowed(g.as_str())).collect(),
            Facet::Country => self.country.as_deref().map(Cow::Borrowed).into_iter().collect(),
            Facet::Language => self.language.as_deref().map(Cow::Borrowed).into_iter().collect(),
            Facet::Status => self.status.as_deref().map(Cow::Borrowed).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn year(&self) -> Option<i32> {
        self.year
    }

    fn score(&self) -> Option<f32> {
        self.siddu_score
    }

    fn popularity(&self) -> f64 {
        self.popularity.unwrap_or(0.0)
    }

    fn director(&self) -> Option<&str> {
        self.director.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(2 + self.cast.len());
        fields.push(self.title.as_str());
        if let Some(director) = &self.director {
            fields.push(director.as_str());
        }
        fields.extend(self.cast.iter().map(String::as_str));
        fields
    }
}

impl Validator for Movie {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        StringValidator::validate_id(&self.id)?;
        StringValidator::validate_title(&self.title)?;
        NumberValidator::validate_year(&self.year)?;
        NumberValidator::validate_score(&self.siddu_score)?;
        NumberValidator::validate_popularity(&self.popularity)?;

        // 分类字段的取值必须能在 URL 中表达
        StringValidator::validate_facet_values(&self.genres)?;
        StringValidator::validate_optional_facet_value(&self.country)?;
        StringValidator::validate_optional_facet_value(&self.language)?;
        StringValidator::validate_optional_facet_value(&self.status)?;

        Ok(())
    }
}
