//! Pure SQL builder for code sample search.
//!
//! A validated [`CodeSampleSearch`] becomes an ordered list of predicate
//! fragments, each a clause with `?` placeholders plus its parameters. The
//! count and page statements render the same fragments, so they can never
//! disagree about the filter. Placeholders are numbered `$1..$n` in the order
//! parameters are appended; no index is reused. `LIMIT` and `OFFSET` always
//! take the last two positions.

use diesel::pg::Pg;
use diesel::query_builder::BoxedSqlQuery;
use diesel::sql_query;
use diesel::sql_types::{Array, BigInt, Text};

use crate::domain::CodeSampleSearch;

const MATCH_CLAUSE: &str = "code_samples.search_index @@ websearch_to_tsquery('english', ?)";
const LANGUAGE_CLAUSE: &str = "code_samples.language_id = ANY(?)";
const RANK_ORDER: &str = "ts_rank(code_samples.search_index, websearch_to_tsquery('english', ?)) DESC, \
     code_samples.created DESC, code_samples.id";

pub(crate) const SELECT_COLUMNS: &str = "SELECT code_samples.id, code_samples.submitted_by_id, \
     users.username AS submitted_by_username, code_samples.language_id, \
     languages.name AS language_name, code_samples.title, code_samples.description, \
     code_samples.body, code_samples.created, code_samples.modified \
     FROM code_samples \
     JOIN users ON users.id = code_samples.submitted_by_id \
     JOIN languages ON languages.id = code_samples.language_id";

/// A positional SQL parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SqlParam {
    Text(String),
    TextArray(Vec<String>),
    BigInt(i64),
}

#[derive(Debug, Clone)]
struct Fragment {
    clause: &'static str,
    params: Vec<SqlParam>,
}

/// Rendered SQL text plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl Statement {
    /// Turn the statement into a boxed Diesel query with every parameter bound.
    pub(crate) fn into_query(self) -> BoxedSqlQuery<'static, Pg, diesel::query_builder::SqlQuery> {
        self.params
            .into_iter()
            .fold(sql_query(self.sql).into_boxed::<Pg>(), |query, param| {
                match param {
                    SqlParam::Text(value) => query.bind::<Text, _>(value),
                    SqlParam::TextArray(values) => query.bind::<Array<Text>, _>(values),
                    SqlParam::BigInt(value) => query.bind::<BigInt, _>(value),
                }
            })
    }
}

/// The count and page statements for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchStatements {
    pub count: Statement,
    pub page: Statement,
}

fn predicate(search: &CodeSampleSearch) -> Vec<Fragment> {
    let mut fragments = vec![Fragment {
        clause: MATCH_CLAUSE,
        params: vec![SqlParam::Text(search.query().to_owned())],
    }];
    if !search.languages().is_empty() {
        fragments.push(Fragment {
            clause: LANGUAGE_CLAUSE,
            params: vec![SqlParam::TextArray(
                search
                    .languages()
                    .iter()
                    .map(|id| id.as_ref().to_owned())
                    .collect(),
            )],
        });
    }
    fragments
}

/// Appends clauses, renumbering `?` placeholders from one running counter.
#[derive(Debug, Default)]
struct Renderer {
    params: Vec<SqlParam>,
}

impl Renderer {
    fn push(&mut self, fragment: Fragment) -> String {
        let mut pending = fragment.params.into_iter();
        let mut rendered = String::with_capacity(fragment.clause.len() + 4);
        for ch in fragment.clause.chars() {
            if ch == '?' {
                if let Some(param) = pending.next() {
                    self.params.push(param);
                }
                rendered.push('$');
                rendered.push_str(&self.params.len().to_string());
            } else {
                rendered.push(ch);
            }
        }
        rendered
    }

    fn push_all(&mut self, fragments: Vec<Fragment>, separator: &str) -> String {
        fragments
            .into_iter()
            .map(|fragment| self.push(fragment))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn finish(self, sql: String) -> Statement {
        Statement {
            sql,
            params: self.params,
        }
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Build the count and page statements for `search`.
pub(crate) fn build_search_statements(search: &CodeSampleSearch) -> SearchStatements {
    let mut count = Renderer::default();
    let count_where = count.push_all(predicate(search), " AND ");
    let count = count.finish(format!(
        "SELECT COUNT(*) AS count FROM code_samples WHERE {count_where}"
    ));

    let mut page = Renderer::default();
    let page_where = page.push_all(predicate(search), " AND ");
    let order = page.push(Fragment {
        clause: RANK_ORDER,
        params: vec![SqlParam::Text(search.query().to_owned())],
    });
    let window = page.push(Fragment {
        clause: "LIMIT ? OFFSET ?",
        params: vec![
            SqlParam::BigInt(i64::from(search.page().page_size())),
            SqlParam::BigInt(saturating_i64(search.page().offset())),
        ],
    });
    let page = page.finish(format!(
        "{SELECT_COLUMNS} WHERE {page_where} ORDER BY {order} {window}"
    ));

    SearchStatements { count, page }
}
