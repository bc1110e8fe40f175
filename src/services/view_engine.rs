// 视图引擎 - 浏览页的筛选与排序
//
// 给定只读的记录集合和 ViewState，推导出筛选并排序后的子序列：
// - 各字段条件之间为"与"关系
// - 全文搜索为不区分大小写的子串匹配
// - 稳定排序，相等元素保持输入顺序
// - 纯函数，不读取系统时间

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{ContentRecord, Facet, FilterState, SortKey, ViewState};

/// 返回满足视图条件的记录在 `records` 中的下标，按视图排序
pub fn apply_view_indices<R: ContentRecord>(records: &[R], view: &ViewState) -> Vec<usize> {
    // 全空白的搜索词不过滤，其余按原样做子串匹配
    let needle = if view.search.trim().is_empty() {
        String::new()
    } else {
        view.search.to_lowercase()
    };

    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_filters(*record, &view.filters) && matches_search(*record, &needle))
        .map(|(index, _)| index)
        .collect();

    // slice::sort_by 是稳定排序
    indices.sort_by(|&a, &b| compare(&records[a], &records[b], view.sort));
    indices
}

/// 筛选并排序，返回对原记录的引用
pub fn apply_view<'a, R: ContentRecord>(records: &'a [R], view: &ViewState) -> Vec<&'a R> {
    apply_view_indices(records, view)
        .into_iter()
        .map(|index| &records[index])
        .collect()
}

/// 记录是否满足所有分类与区间条件
pub fn matches_filters<R: ContentRecord>(record: &R, filters: &FilterState) -> bool {
    for (facet, selected) in filters.selections() {
        let values = record.facet_values(facet);
        if !values.iter().any(|v| selected.iter().any(|s| s == v.as_ref())) {
            return false;
        }
    }

    if let Some(range) = filters.year_range {
        if !record.year().is_some_and(|year| range.contains(year)) {
            return false;
        }
    }

    if let Some(range) = filters.score_range {
        if !record.score().is_some_and(|score| range.contains(score)) {
            return false;
        }
    }

    true
}

/// `needle` 必须已经转为小写；空串表示不过滤
pub fn matches_search<R: ContentRecord>(record: &R, needle: &str) -> bool {
    needle.is_empty()
        || record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// 按排序键比较两条记录；只比较排序字段，不引入次级键
pub fn compare<R: ContentRecord>(a: &R, b: &R, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Latest => year_of(b).cmp(&year_of(a)),
        SortKey::Oldest => year_of(a).cmp(&year_of(b)),
        SortKey::Score => score_of(b).total_cmp(&score_of(a)),
        SortKey::Popular => b.popularity().total_cmp(&a.popularity()),
        SortKey::ViewsDesc => b.views().cmp(&a.views()),
        SortKey::ViewsAsc => a.views().cmp(&b.views()),
        SortKey::Alphabetical => compare_text(a.title(), b.title()),
        SortKey::AlphabeticalDesc => compare_text(b.title(), a.title()),
        SortKey::DirectorAsc => compare_text(director_of(a), director_of(b)),
        SortKey::DirectorDesc => compare_text(director_of(b), director_of(a)),
        SortKey::FilmAsc => compare_text(film_of(a), film_of(b)),
        SortKey::FilmDesc => compare_text(film_of(b), film_of(a)),
    }
}

// 缺失的年份和评分按 0 处理
fn year_of<R: ContentRecord>(record: &R) -> i32 {
    record.year().unwrap_or(0)
}

fn score_of<R: ContentRecord>(record: &R) -> f32 {
    record.score().unwrap_or(0.0)
}

fn director_of<R: ContentRecord>(record: &R) -> &str {
    record.director().unwrap_or("")
}

fn film_of<R: ContentRecord>(record: &R) -> &str {
    record.film().unwrap_or("")
}

/// 先忽略大小写比较，再按原文比较
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// 筛选侧栏中的一个候选值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub value: String,
    pub count: usize,
}

/// 统计某个分类字段在整个目录中的所有取值及其记录数，按取值排序
pub fn facet_options<R: ContentRecord>(records: &[R], facet: Facet) -> Vec<FacetOption> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let mut values = record.facet_values(facet);
        values.sort();
        values.dedup();
        for value in values {
            *counts.entry(value.into_owned()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(value, count)| FacetOption { value, count })
        .collect()
}

/// 详情弹窗中的上一条/下一条
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbors {
    pub previous: String,
    pub next: String,
}

/// 在当前视图中查找相邻记录（首尾循环）。记录不在视图中时返回 `None`。
pub fn neighbors<R: ContentRecord>(view: &[&R], id: &str) -> Option<Neighbors> {
    let position = view.iter().position(|record| record.id() == id)?;
    let len = view.len();
    let previous = view[(position + len - 1) % len];
    let next = view[(position + 1) % len];

    Some(Neighbors {
        previous: previous.id().to_string(),
        next: next.id().to_string(),
    })
}
