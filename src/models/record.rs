use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::validation::{ValidationError, Validator};

/// 可按取值集合筛选的分类字段
///
/// 声明顺序即 URL 中参数的输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Genre,
    Country,
    Language,
    Status,
    Category,
    Tag,
    Director,
    Cinematographer,
    Decade,
}

impl Facet {
    pub const ALL: [Facet; 9] = [
        Facet::Genre,
        Facet::Country,
        Facet::Language,
        Facet::Status,
        Facet::Category,
        Facet::Tag,
        Facet::Director,
        Facet::Cinematographer,
        Facet::Decade,
    ];

    /// 对应的 URL 查询参数名
    pub fn param(&self) -> &'static str {
        match self {
            Facet::Genre => "genres",
            Facet::Country => "countries",
            Facet::Language => "languages",
            Facet::Status => "status",
            Facet::Category => "categories",
            Facet::Tag => "tags",
            Facet::Director => "directors",
            Facet::Cinematographer => "cinematographers",
            Facet::Decade => "decades",
        }
    }

    /// 从 URL 查询参数名解析
    pub fn from_param(param: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.param() == param)
    }
}

/// 年代标签，例如 2010 -> "2010s"
pub fn decade_label(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// 可浏览的内容记录
///
/// 记录一经加载即为只读快照，筛选与排序只通过这些访问器读取字段。
pub trait ContentRecord:
    Clone + Serialize + Validator<Error = ValidationError> + Send + Sync + 'static
{
    fn id(&self) -> &str;

    fn title(&self) -> &str;

    /// 某个分类字段上的取值；记录不具备该字段时返回空列表
    fn facet_values(&self, facet: Facet) -> Vec<Cow<'_, str>>;

    fn year(&self) -> Option<i32>;

    fn score(&self) -> Option<f32>;

    /// "popular" 排序所用的热度
    fn popularity(&self) -> f64;

    fn views(&self) -> u64 {
        0
    }

    fn director(&self) -> Option<&str> {
        None
    }

    fn film(&self) -> Option<&str> {
        None
    }

    /// 参与全文搜索的字段
    fn search_fields(&self) -> Vec<&str>;
}
