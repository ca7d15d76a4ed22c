//! Upstream operations and the requests built for them.

use crate::cache::RequestSignature;
use crate::types::{Language, Page};

/// One upstream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SearchKeyword,
    AreaBasedList,
    LocationBasedList,
    SearchFestival,
    SearchStay,
    DetailCommon,
    DetailIntro,
    DetailInfo,
    DetailImage,
    AreaCode,
}

impl Operation {
    /// Stable name used in logs, metrics and cache signatures.
    pub fn name(self) -> &'static str {
        match self {
            Operation::SearchKeyword => "search_keyword",
            Operation::AreaBasedList => "area_based_list",
            Operation::LocationBasedList => "location_based_list",
            Operation::SearchFestival => "search_festival",
            Operation::SearchStay => "search_stay",
            Operation::DetailCommon => "detail_common",
            Operation::DetailIntro => "detail_intro",
            Operation::DetailInfo => "detail_info",
            Operation::DetailImage => "detail_image",
            Operation::AreaCode => "area_code",
        }
    }

    /// Path segment after the language service.
    pub fn path(self) -> &'static str {
        match self {
            Operation::SearchKeyword => "searchKeyword1",
            Operation::AreaBasedList => "areaBasedList1",
            Operation::LocationBasedList => "locationBasedList1",
            Operation::SearchFestival => "searchFestival1",
            Operation::SearchStay => "searchStay1",
            Operation::DetailCommon => "detailCommon1",
            Operation::DetailIntro => "detailIntro1",
            Operation::DetailInfo => "detailInfo1",
            Operation::DetailImage => "detailImage1",
            Operation::AreaCode => "areaCode1",
        }
    }
}

/// A fully resolved upstream request, minus credentials.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub operation: Operation,
    pub language: Language,
    pub page: Page,
    params: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    pub fn new(operation: Operation, language: Language, page: Page) -> Self {
        Self {
            operation,
            language,
            page,
            params: vec![
                ("pageNo", page.page.to_string()),
                ("numOfRows", page.rows.to_string()),
            ],
        }
    }

    /// Add a parameter.
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Add a parameter only when a value is present.
    pub fn opt_param<V: ToString>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// URL relative to the configured base: `{service}/{operation}`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.language.service(), self.operation.path())
    }

    /// Cache key for this request.
    pub fn signature(&self) -> RequestSignature {
        RequestSignature::new(self.operation.name(), self.language.code(), &self.params)
    }
}
