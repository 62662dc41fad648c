//! 事件列表：过滤、排序、分页
//!
//! 列表页的全部状态由 [`ListingState`] 持有，视图只通过
//! [`ListingState::apply`] 派发 [`ListingAction`] 修改它。

use crate::model::Event;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// 可选的每页条数
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZES[0];

/// 当前页两侧显示的相邻页数
const PAGE_NEIGHBOURS: usize = 2;

// =========================================================
// 过滤条件
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub name: String,
    pub operator: String,
    pub invoice_number: String,
    pub date_from: Option<NaiveDate>,
    /// 包含当天
    pub date_to: Option<NaiveDate>,
    /// `Some(true)` 仅有订单，`Some(false)` 仅无订单
    pub order_status: Option<bool>,
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.operator.trim().is_empty()
            && self.invoice_number.trim().is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.order_status.is_none()
    }

    /// 所有条件 AND 组合；缺少被检查字段的记录不匹配该条件
    pub fn matches(&self, event: &Event) -> bool {
        if !contains_folded(&event.name, &self.name) {
            return false;
        }
        if !contains_folded(&event.operator, &self.operator) {
            return false;
        }

        let invoice_query = self.invoice_number.trim();
        if !invoice_query.is_empty()
            && !event
                .invoice_numbers()
                .any(|n| contains_folded(n, invoice_query))
        {
            return false;
        }

        if let Some(from) = self.date_from {
            match event.start_date {
                Some(start) if start >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = self.date_to {
            match event.start_date {
                Some(start) if start <= to => {}
                _ => return false,
            }
        }

        if let Some(has_order) = self.order_status {
            if event.has_order != has_order {
                return false;
            }
        }

        true
    }
}

/// 返回满足条件的子序列，保持原有顺序
pub fn filter_events(events: &[Event], criteria: &FilterCriteria) -> Vec<Event> {
    if criteria.is_empty() {
        return events.to_vec();
    }
    events
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect()
}

/// 按开始日期降序排列，没有开始日期的记录排在最后
pub fn sort_by_start_desc(events: &mut [Event]) {
    events.sort_by(|a, b| match (a.start_date, b.start_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

// =========================================================
// 分页
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 从 1 开始
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn page_count(&self, total_items: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        total_items.div_ceil(self.page_size)
    }

    /// 当前页在过滤结果中的下标范围 `[(k-1)S, kS)`
    pub fn range(&self, total_items: usize) -> std::ops::Range<usize> {
        let start = (self.page.saturating_sub(1) * self.page_size).min(total_items);
        let end = (start + self.page_size).min(total_items);
        start..end
    }

    /// 跳转到指定页；0 或超过最后一页时不变，返回是否发生了跳转
    pub fn go_to(&mut self, page: usize, total_items: usize) -> bool {
        if page == 0 || page > self.page_count(total_items) {
            return false;
        }
        self.page = page;
        true
    }
}

/// 分页按钮序列中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// 生成分页按钮：首页、末页、当前页两侧各 2 页，中间用省略号隔开
pub fn page_window(current: usize, total: usize) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let start = current.saturating_sub(PAGE_NEIGHBOURS).max(1);
    let end = (current + PAGE_NEIGHBOURS).min(total);

    let mut items = Vec::with_capacity(end - start + 5);
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end + 1 < total {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total));
    }
    items
}

// =========================================================
// 统计
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ListingStats {
    pub total_events: usize,
    pub total_revenue: f64,
    /// 尚无订单的事件数
    pub pending_orders: usize,
}

impl ListingStats {
    pub fn compute(events: &[Event]) -> Self {
        Self {
            total_events: events.len(),
            total_revenue: events
                .iter()
                .map(Event::display_total)
                .fold(0.0, |acc, v| acc + v),
            pending_orders: events.iter().filter(|e| !e.has_order).count(),
        }
    }
}

// =========================================================
// 列表状态
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ListingAction {
    /// 从存储完整加载
    Loaded(Vec<Event>),
    SetFilters(FilterCriteria),
    ClearFilters,
    SetPageSize(usize),
    GoToPage(usize),
    /// 保存成功后替换本地副本
    EventSaved(Event),
    /// 删除成功后移除本地副本
    EventDeleted(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingState {
    events: Vec<Event>,
    filtered: Vec<Event>,
    criteria: FilterCriteria,
    pagination: Pagination,
    loaded: bool,
}

impl ListingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: ListingAction) {
        match action {
            ListingAction::Loaded(mut events) => {
                sort_by_start_desc(&mut events);
                self.events = events;
                self.loaded = true;
                self.refilter();
            }
            ListingAction::SetFilters(criteria) => {
                self.criteria = criteria;
                self.refilter();
            }
            ListingAction::ClearFilters => {
                self.criteria = FilterCriteria::default();
                self.refilter();
            }
            ListingAction::SetPageSize(size) => {
                if size > 0 {
                    self.pagination.page_size = size;
                    self.pagination.page = 1;
                }
            }
            ListingAction::GoToPage(page) => {
                let total = self.filtered.len();
                self.pagination.go_to(page, total);
            }
            ListingAction::EventSaved(event) => {
                if let Some(slot) = self.events.iter_mut().find(|e| e.id == event.id) {
                    *slot = event;
                } else {
                    self.events.push(event);
                    sort_by_start_desc(&mut self.events);
                }
                self.refilter_keep_page();
            }
            ListingAction::EventDeleted(id) => {
                self.events.retain(|e| e.id != id);
                self.refilter_keep_page();
            }
        }
    }

    /// 条件变化：重新过滤并回到第 1 页
    fn refilter(&mut self) {
        self.filtered = filter_events(&self.events, &self.criteria);
        self.pagination.page = 1;
    }

    /// 本地补丁：重新过滤，尽量停留在当前页
    fn refilter_keep_page(&mut self) {
        self.filtered = filter_events(&self.events, &self.criteria);
        let last = self.page_count().max(1);
        self.pagination.page = self.pagination.page.min(last);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn filtered(&self) -> &[Event] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.filtered.len())
    }

    /// 当前页的记录
    pub fn page_items(&self) -> &[Event] {
        &self.filtered[self.pagination.range(self.filtered.len())]
    }

    pub fn page_window(&self) -> Vec<PageItem> {
        page_window(self.pagination.page, self.page_count())
    }

    pub fn find(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn stats(&self) -> ListingStats {
        ListingStats::compute(&self.filtered)
    }
}
