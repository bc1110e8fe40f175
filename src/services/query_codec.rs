// 查询串编解码 - ViewState <-> URL 查询参数
//
// 参数表（缺省即默认值）：
// - view: grid | list
// - sort: 排序键
// - search: 搜索词
// - genres / countries / ... : 逗号分隔的取值列表
// - yearStart / yearEnd: 整数
// - scoreStart / scoreEnd: 浮点数
//
// 写出时省略等于默认值的字段；读入时任何格式错误都回退到该字段的默认值。

use std::collections::HashMap;
use url::form_urlencoded;

use crate::models::{ScoreRange, SortKey, ViewDefaults, ViewMode, ViewState, YearRange};

const PARAM_VIEW: &str = "view";
const PARAM_SORT: &str = "sort";
const PARAM_SEARCH: &str = "search";
const PARAM_YEAR_START: &str = "yearStart";
const PARAM_YEAR_END: &str = "yearEnd";
const PARAM_SCORE_START: &str = "scoreStart";
const PARAM_SCORE_END: &str = "scoreEnd";

/// 某个目录的查询串编解码器
#[derive(Debug, Clone)]
pub struct QueryCodec {
    defaults: ViewDefaults,
}

impl QueryCodec {
    pub fn new(defaults: ViewDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ViewDefaults {
        &self.defaults
    }

    /// 把视图写成查询串（不带 `?`），全默认的视图得到空串
    pub fn serialize(&self, view: &ViewState) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        if view.view_mode != ViewMode::default() {
            query.append_pair(PARAM_VIEW, view.view_mode.as_str());
        }
        if view.sort != self.defaults.sort {
            query.append_pair(PARAM_SORT, view.sort.as_str());
        }
        if !view.search.is_empty() {
            query.append_pair(PARAM_SEARCH, &view.search);
        }

        for facet in &self.defaults.facets {
            let selected = view.filters.selected(*facet);
            if !selected.is_empty() {
                let joined = selected
                    .iter()
                    .map(|value| escape_list_item(value))
                    .collect::<Vec<_>>()
                    .join(",");
                query.append_pair(facet.param(), &joined);
            }
        }

        if let (Some(range), Some(full)) = (view.filters.year_range, self.defaults.year_range) {
            if range.start() != full.start() {
                query.append_pair(PARAM_YEAR_START, &range.start().to_string());
            }
            if range.end() != full.end() {
                query.append_pair(PARAM_YEAR_END, &range.end().to_string());
            }
        }

        if let (Some(range), Some(full)) = (view.filters.score_range, self.defaults.score_range) {
            if range.min() != full.min() {
                query.append_pair(PARAM_SCORE_START, &range.min().to_string());
            }
            if range.max() != full.max() {
                query.append_pair(PARAM_SCORE_END, &range.max().to_string());
            }
        }

        query.finish()
    }

    /// 从查询串还原视图，可带前导 `?`。从不失败。
    pub fn deserialize(&self, query: &str) -> ViewState {
        let params = first_values(query.strip_prefix('?').unwrap_or(query));
        let mut view = self.defaults.initial_view();

        if let Some(raw) = params.get(PARAM_VIEW) {
            match ViewMode::from_param(raw) {
                Some(mode) => view.view_mode = mode,
                None => tracing::debug!("Ignoring unknown view mode: {}", raw),
            }
        }

        if let Some(raw) = params.get(PARAM_SORT) {
            match SortKey::from_param(raw) {
                Some(sort) if self.defaults.accepts_sort(sort) => view.sort = sort,
                Some(_) => tracing::debug!("Ignoring sort key not offered by this catalog: {}", raw),
                None => tracing::debug!("Ignoring unknown sort key: {}", raw),
            }
        }

        if let Some(search) = params.get(PARAM_SEARCH) {
            view.search = search.clone();
        }

        for facet in &self.defaults.facets {
            if let Some(raw) = params.get(facet.param()) {
                view.filters
                    .set_selection(*facet, raw.split(',').map(unescape_list_item));
            }
        }

        if let Some(full) = self.defaults.year_range {
            let start = parse_year(params.get(PARAM_YEAR_START)).unwrap_or(full.start());
            let end = parse_year(params.get(PARAM_YEAR_END)).unwrap_or(full.end());
            view.filters.year_range = match YearRange::new(start, end) {
                Some(range) if range != full => Some(range),
                Some(_) => None,
                None => {
                    tracing::debug!("Ignoring inverted year range: {}..{}", start, end);
                    None
                }
            };
        }

        if let Some(full) = self.defaults.score_range {
            let min = parse_score(params.get(PARAM_SCORE_START), &full).unwrap_or(full.min());
            let max = parse_score(params.get(PARAM_SCORE_END), &full).unwrap_or(full.max());
            view.filters.score_range = match ScoreRange::new(min, max) {
                Some(range) if range != full => Some(range),
                Some(_) => None,
                None => {
                    tracing::debug!("Ignoring inverted score range: {}..{}", min, max);
                    None
                }
            };
        }

        view
    }

    /// 规范化查询串：解析后重新写出
    pub fn canonicalize(&self, query: &str) -> String {
        self.serialize(&self.deserialize(query))
    }
}

/// 每个参数只取第一次出现的值
fn first_values(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

fn parse_year(raw: Option<&String>) -> Option<i32> {
    let raw = raw?;
    match raw.trim().parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            tracing::debug!("Malformed year parameter: {:?}", raw);
            None
        }
    }
}

fn parse_score(raw: Option<&String>, bounds: &ScoreRange) -> Option<f32> {
    let raw = raw?;
    match raw.trim().parse::<f32>() {
        Ok(score) if score.is_finite() => Some(score.clamp(bounds.min(), bounds.max())),
        _ => {
            tracing::debug!("Malformed score parameter: {:?}", raw);
            None
        }
    }
}

/// 列表项中的 `%` 与 `,` 需要转义，否则无法与分隔符区分
fn escape_list_item(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ',' => escaped.push_str("%2C"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_list_item(item: &str) -> String {
    let mut result = String::with_capacity(item.len());
    let mut rest = item;
    while let Some(pos) = rest.find('%') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("%25") {
            result.push('%');
            rest = after;
        } else if let Some(after) = tail
            .strip_prefix("%2C")
            .or_else(|| tail.strip_prefix("%2c"))
        {
            result.push(',');
            rest = after;
        } else {
            result.push('%');
            rest = &tail[1..];
        }
    }
    result.push_str(rest);
    result
}
