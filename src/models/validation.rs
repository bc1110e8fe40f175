use thiserror::Error;

/// 验证错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Record ID cannot be empty")]
    EmptyId,

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title is too long (max 500 characters)")]
    TitleTooLong,

    #[error("Invalid year: {0} (must be between 1800 and 2100)")]
    InvalidYear(i32),

    #[error("Invalid score: {0} (must be between 0.0 and 10.0)")]
    InvalidScore(f32),

    #[error("Invalid popularity: {0} (must be a non-negative number)")]
    InvalidPopularity(f64),

    #[error("Facet value cannot be empty")]
    EmptyFacetValue,

    #[error("Facet value is too long (max 100 characters)")]
    FacetValueTooLong,
}

/// 验证器trait
pub trait Validator {
    type Error;

    fn validate(&self) -> Result<(), Self::Error>;
}

/// 字符串验证工具
pub struct StringValidator;

impl StringValidator {
    pub fn validate_id(id: &str) -> Result<(), ValidationError> {
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(())
    }

    pub fn validate_title(title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        if title.len() > 500 {
            return Err(ValidationError::TitleTooLong);
        }

        Ok(())
    }

    /// 分类取值不能为空，否则在 URL 中无法表达
    pub fn validate_facet_value(value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyFacetValue);
        }

        if value.len() > 100 {
            return Err(ValidationError::FacetValueTooLong);
        }

        Ok(())
    }

    pub fn validate_facet_values<'a>(
        values: impl IntoIterator<Item = &'a String>,
    ) -> Result<(), ValidationError> {
        for value in values {
            Self::validate_facet_value(value)?;
        }
        Ok(())
    }

    pub fn validate_optional_facet_value(value: &Option<String>) -> Result<(), ValidationError> {
        if let Some(v) = value {
            Self::validate_facet_value(v)?;
        }
        Ok(())
    }
}

/// 数值验证工具
pub struct NumberValidator;

impl NumberValidator {
    pub fn validate_year(year: &Option<i32>) -> Result<(), ValidationError> {
        if let Some(y) = year {
            if *y < 1800 || *y > 2100 {
                return Err(ValidationError::InvalidYear(*y));
            }
        }
        Ok(())
    }

    pub fn validate_score(score: &Option<f32>) -> Result<(), ValidationError> {
        if let Some(s) = score {
            if !s.is_finite() || *s < 0.0 || *s > 10.0 {
                return Err(ValidationError::InvalidScore(*s));
            }
        }
        Ok(())
    }

    pub fn validate_popularity(popularity: &Option<f64>) -> Result<(), ValidationError> {
        if let Some(p) = popularity {
            if !p.is_finite() || *p < 0.0 {
                return Err(ValidationError::InvalidPopularity(*p));
            }
        }
        Ok(())
    }
}
