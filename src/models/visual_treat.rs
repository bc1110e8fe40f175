use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::record::{decade_label, ContentRecord, Facet};
use super::validation::{NumberValidator, StringValidator, ValidationError, Validator};

/// 视觉盛宴：电影中的经典画面
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualTreat {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub film: String,
    pub director: String,
    pub cinematographer: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub year: i32,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    pub image_url: Option<String>,
    #[serde(default)]
    pub color_palette: Vec<String>,
}

impl ContentRecord for VisualTreat {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn facet_values(&self, facet: Facet) -> Vec<Cow<'_, str>> {
        match facet {
            Facet::Category => vec![Cow::Borrowed(self.category.as_str())],
            Facet::Tag => self.tags.iter().map(|t| Cow::Borrowed(t.as_str())).collect(),
            Facet::Director => vec![Cow::Borrowed(self.director.as_str())],
            Facet::Cinematographer => vec![Cow::Borrowed(self.cinematographer.as_str())],
            Facet::Decade => vec![Cow::Owned(decade_label(self.year))],
            _ => Vec::new(),
        }
    }

    fn year(&self) -> Option<i32> {
        Some(self.year)
    }

    fn score(&self) -> Option<f32> {
        None
    }

    // 点赞数即热度
    fn popularity(&self) -> f64 {
        self.likes as f64
    }

    fn views(&self) -> u64 {
        self.views
    }

    fn director(&self) -> Option<&str> {
        Some(&self.director)
    }

    fn film(&self) -> Option<&str> {
        Some(&self.film)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.description.as_str(),
            self.film.as_str(),
            self.director.as_str(),
        ];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

impl Validator for VisualTreat {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        StringValidator::validate_id(&self.id)?;
        StringValidator::validate_title(&self.title)?;
        NumberValidator::validate_year(&Some(self.year))?;
        StringValidator::validate_facet_value(&self.category)?;
        StringValidator::validate_facet_value(&self.director)?;
        StringValidator::validate_facet_value(&self.cinematographer)?;
        StringValidator::validate_facet_values(&self.tags)?;
        Ok(())
    }
}
