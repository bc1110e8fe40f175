use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::record::Facet;

/// 展示模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

/// 排序方式（字段 + 方向），同一时刻只有一个生效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "latest")]
    Latest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "score")]
    Score,
    #[serde(rename = "popular")]
    Popular,
    #[serde(rename = "views_desc")]
    ViewsDesc,
    #[serde(rename = "views_asc")]
    ViewsAsc,
    #[serde(rename = "alphabetical")]
    Alphabetical,
    #[serde(rename = "alphabetical-desc")]
    AlphabeticalDesc,
    #[serde(rename = "director_asc")]
    DirectorAsc,
    #[serde(rename = "director_desc")]
    DirectorDesc,
    #[serde(rename = "film_asc")]
    FilmAsc,
    #[serde(rename = "film_desc")]
    FilmDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 12] = [
        SortKey::Latest,
        SortKey::Oldest,
        SortKey::Score,
        SortKey::Popular,
        SortKey::ViewsDesc,
        SortKey::ViewsAsc,
        SortKey::Alphabetical,
        SortKey::AlphabeticalDesc,
        SortKey::DirectorAsc,
        SortKey::DirectorDesc,
        SortKey::FilmAsc,
        SortKey::FilmDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::Oldest => "oldest",
            SortKey::Score => "score",
            SortKey::Popular => "popular",
            SortKey::ViewsDesc => "views_desc",
            SortKey::ViewsAsc => "views_asc",
            SortKey::Alphabetical => "alphabetical",
            SortKey::AlphabeticalDesc => "alphabetical-desc",
            SortKey::DirectorAsc => "director_asc",
            SortKey::DirectorDesc => "director_desc",
            SortKey::FilmAsc => "film_asc",
            SortKey::FilmDesc => "film_desc",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

/// 年份闭区间，构造时保证 start <= end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// 评分闭区间，构造时保证两端有限且 min <= max
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    min: f32,
    max: f32,
}

impl ScoreRange {
    pub fn new(min: f32, max: f32) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn contains(&self, score: f32) -> bool {
        self.min <= score && score <= self.max
    }

    /// 把区间夹进 `bounds` 之内
    pub fn clamp_to(&self, bounds: &ScoreRange) -> ScoreRange {
        ScoreRange {
            min: self.min.clamp(bounds.min, bounds.max),
            max: self.max.clamp(bounds.min, bounds.max),
        }
    }
}

/// 一个可单独移除的生效筛选条件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActiveFilter {
    Facet { facet: Facet, value: String },
    YearRange { start: i32, end: i32 },
    ScoreRange { min: f32, max: f32 },
}

/// 筛选状态
///
/// 空的选择集合表示该字段不参与筛选；`None` 的区间表示完整默认区间。
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterState {
    selections: BTreeMap<Facet, Vec<String>>,
    pub year_range: Option<YearRange>,
    pub score_range: Option<ScoreRange>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 某个字段当前选中的取值，按选中顺序
    pub fn selected(&self, facet: Facet) -> &[String] {
        self.selections.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 所有非空的选择
    pub fn selections(&self) -> impl Iterator<Item = (Facet, &[String])> {
        self.selections
            .iter()
            .map(|(facet, values)| (*facet, values.as_slice()))
    }

    /// 选中一个取值，返回是否发生了变化
    pub fn select(&mut self, facet: Facet, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        let values = self.selections.entry(facet).or_default();
        if values.contains(&value) {
            return false;
        }
        values.push(value);
        true
    }

    /// 取消选中，返回是否发生了变化
    pub fn deselect(&mut self, facet: Facet, value: &str) -> bool {
        let Some(values) = self.selections.get_mut(&facet) else {
            return false;
        };
        let before = values.len();
        values.retain(|v| v != value);
        let changed = values.len() != before;
        if values.is_empty() {
            self.selections.remove(&facet);
        }
        changed
    }

    pub fn toggle(&mut self, facet: Facet, value: &str) {
        if !self.deselect(facet, value) {
            self.select(facet, value);
        }
    }

    /// 整体替换某个字段的选择：去掉空值和重复值，保留首次出现的顺序
    pub fn set_selection<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections.remove(&facet);
        for value in values {
            self.select(facet, value);
        }
    }

    pub fn clear_facet(&mut self, facet: Facet) {
        self.selections.remove(&facet);
    }

    /// 只保留 `keep` 返回 true 的字段
    pub fn retain_facets(&mut self, mut keep: impl FnMut(Facet) -> bool) {
        self.selections.retain(|facet, _| keep(*facet));
    }

    pub fn has_active_filters(&self) -> bool {
        !self.selections.is_empty() || self.year_range.is_some() || self.score_range.is_some()
    }

    /// 以"标签"形式列出所有生效的筛选条件
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut active: Vec<ActiveFilter> = self
            .selections()
            .flat_map(|(facet, values)| {
                values.iter().map(move |value| ActiveFilter::Facet {
                    facet,
                    value: value.clone(),
                })
            })
            .collect();

        if let Some(range) = self.year_range {
            active.push(ActiveFilter::YearRange {
                start: range.start(),
                end: range.end(),
            });
        }
        if let Some(range) = self.score_range {
            active.push(ActiveFilter::ScoreRange {
                min: range.min(),
                max: range.max(),
            });
        }
        active
    }

    /// 移除一个筛选条件，区间类条件恢复为默认区间
    pub fn remove(&mut self, filter: &ActiveFilter) -> bool {
        match filter {
            ActiveFilter::Facet { facet, value } => self.deselect(*facet, value),
            ActiveFilter::YearRange { .. } => self.year_range.take().is_some(),
            ActiveFilter::ScoreRange { .. } => self.score_range.take().is_some(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 浏览页的完整可序列化状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub filters: FilterState,
    pub sort: SortKey,
    pub search: String,
    pub view_mode: ViewMode,
}

/// 某个目录的默认值表
///
/// URL 中省略的参数都按这里的默认值还原。年份上限在构造时取定，
/// 之后筛选与排序不再读取系统时间。
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefaults {
    pub sort: SortKey,
    /// 完整年份区间；`None` 表示该目录不支持按年份区间筛选
    pub year_range: Option<YearRange>,
    /// 完整评分区间；`None` 表示该目录不支持按评分区间筛选
    pub score_range: Option<ScoreRange>,
    /// 该目录接受的分类字段，顺序即 URL 中的参数顺序
    pub facets: Vec<Facet>,
    /// 该目录可用的排序方式，包含默认排序
    pub sorts: Vec<SortKey>,
}

impl ViewDefaults {
    pub const YEAR_FLOOR: i32 = 1900;
    pub const SCORE_MIN: f32 = 0.0;
    pub const SCORE_MAX: f32 = 10.0;

    /// 电影浏览页
    pub fn movies(current_year: i32) -> Self {
        Self {
            sort: SortKey::Latest,
            year_range: Some(Self::full_year_range(current_year)),
            score_range: ScoreRange::new(Self::SCORE_MIN, Self::SCORE_MAX),
            facets: vec![Facet::Genre, Facet::Country, Facet::Language, Facet::Status],
            sorts: vec![
                SortKey::Latest,
                SortKey::Score,
                SortKey::Popular,
                SortKey::Alphabetical,
                SortKey::AlphabeticalDesc,
            ],
        }
    }

    /// 视觉盛宴浏览页
    pub fn visual_treats(current_year: i32) -> Self {
        Self {
            sort: SortKey::Popular,
            year_range: Some(Self::full_year_range(current_year)),
            score_range: None,
            facets: vec![
                Facet::Category,
                Facet::Tag,
                Facet::Director,
                Facet::Cinematographer,
                Facet::Decade,
            ],
            // 视觉盛宴没有评分
            sorts: vec![
                SortKey::Popular,
                SortKey::Latest,
                SortKey::Oldest,
                SortKey::Alphabetical,
                SortKey::AlphabeticalDesc,
                SortKey::DirectorAsc,
                SortKey::DirectorDesc,
                SortKey::FilmAsc,
                SortKey::FilmDesc,
                SortKey::ViewsDesc,
                SortKey::ViewsAsc,
            ],
        }
    }

    fn full_year_range(current_year: i32) -> YearRange {
        YearRange {
            start: Self::YEAR_FLOOR,
            end: current_year.max(Self::YEAR_FLOOR),
        }
    }

    pub fn accepts(&self, facet: Facet) -> bool {
        self.facets.contains(&facet)
    }

    pub fn accepts_sort(&self, sort: SortKey) -> bool {
        self.sorts.contains(&sort)
    }

    /// 全部字段取默认值的视图
    pub fn initial_view(&self) -> ViewState {
        ViewState {
            filters: FilterState::default(),
            sort: self.sort,
            search: String::new(),
            view_mode: ViewMode::default(),
        }
    }

    /// 规范化：丢弃不支持的字段与排序，评分夹进完整区间，等于完整区间的区间折叠为 `None`
    pub fn normalize(&self, mut view: ViewState) -> ViewState {
        view.filters.retain_facets(|facet| self.accepts(facet));
        if !self.accepts_sort(view.sort) {
            view.sort = self.sort;
        }

        view.filters.year_range = match (view.filters.year_range, self.year_range) {
            (Some(range), Some(full)) if range != full => Some(range),
            _ => None,
        };

        view.filters.score_range = match (view.filters.score_range, self.score_range) {
            (Some(range), Some(full)) => Some(range.clamp_to(&full)).filter(|r| *r != full),
            _ => None,
        };

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_param_roundtrip() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_param(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::from_param("newest"), None);
        assert_eq!(ViewMode::from_param("list"), Some(ViewMode::List));
        assert_eq!(ViewMode::from_param("List"), None);
    }

    #[test]
    fn test_each_catalog_offers_its_default_sort() {
        for defaults in [ViewDefaults::movies(2025), ViewDefaults::visual_treats(2025)] {
            assert!(defaults.accepts_sort(defaults.sort));
        }
        assert!(!ViewDefaults::movies(2025).accepts_sort(SortKey::FilmAsc));
        assert!(!ViewDefaults::visual_treats(2025).accepts_sort(SortKey::Score));
    }

    #[test]
    fn test_normalize_resets_unsupported_sort() {
        let defaults = ViewDefaults::movies(2025);
        let mut view = defaults.initial_view();
        view.sort = SortKey::ViewsDesc;
        assert_eq!(defaults.normalize(view).sort, SortKey::Latest);
    }

    #[test]
    fn test_ranges_reject_inverted_bounds() {
        assert!(YearRange::new(2010, 2000).is_none());
        assert!(ScoreRange::new(9.0, 1.0).is_none());
        assert!(ScoreRange::new(f32::NAN, 1.0).is_none());
        assert!(YearRange::new(2000, 2000).unwrap().contains(2000));
    }

    #[test]
    fn test_select_ignores_duplicates_and_empty_values() {
        let mut filters = FilterState::new();
        assert!(filters.select(Facet::Genre, "Drama"));
        assert!(!filters.select(Facet::Genre, "Drama"));
        assert!(!filters.select(Facet::Genre, ""));
        assert_eq!(filters.selected(Facet::Genre), ["Drama".to_string()]);
    }

    #[test]
    fn test_deselect_last_value_clears_facet() {
        let mut filters = FilterState::new();
        filters.select(Facet::Genre, "Drama");
        assert!(filters.deselect(Facet::Genre, "Drama"));
        assert!(!filters.has_active_filters());
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn test_active_filters_and_remove() {
        let mut filters = FilterState::new();
        filters.select(Facet::Genre, "Drama");
        filters.year_range = YearRange::new(2000, 2010);

        let active = filters.active_filters();
        assert_eq!(active.len(), 2);
        assert!(filters.has_active_filters());

        for chip in &active {
            assert!(filters.remove(chip));
        }
        assert!(!filters.has_active_filters());
    }

    #[test]
    fn test_normalize_collapses_full_ranges() {
        let defaults = ViewDefaults::movies(2025);
        let mut view = defaults.initial_view();
        view.filters.year_range = YearRange::new(1900, 2025);
        view.filters.score_range = ScoreRange::new(-3.0, 12.0);
        view.filters.select(Facet::Tag, "rain");

        let normalized = defaults.normalize(view);
        assert_eq!(normalized, defaults.initial_view());
    }

    #[test]
    fn test_normalize_drops_score_range_for_treats() {
        let defaults = ViewDefaults::visual_treats(2025);
        let mut view = defaults.initial_view();
        view.filters.score_range = ScoreRange::new(5.0, 8.0);
        assert!(defaults.normalize(view).filters.score_range.is_none());
    }
}
