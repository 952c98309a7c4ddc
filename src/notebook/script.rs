//! Chart cell extraction.
//!
//! Recovers a [`StackedBarChart`] from the plotting code of a notebook cell
//! without executing it: literal assignments, `.bar(...)` calls and the
//! axis/title setters are scanned from the text. Missing line breaks between
//! statements are tolerated.

use crate::charts::{BarSeries, ChartError, StackedBarChart, DEFAULT_BAR_WIDTH};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static LIST_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*=\s*(\[[^\]]*\])").unwrap());

static NUMBER_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_]\w*)\s*=\s*(-?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?)").unwrap()
});

static TEXT_SETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.set_(ylabel|xlabel|title)\(\s*(?:'([^']*)'|"([^"]*)")"#).unwrap()
});

const BAR_CALL: &str = ".bar(";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Cell has no bar() calls")]
    NoBarCalls,
    #[error("Name '{0}' is not assigned a literal in this cell")]
    UnknownName(String),
    #[error("bar() call {call}: missing argument '{name}'")]
    MissingArgument { call: usize, name: &'static str },
    #[error("bar() call {call}: {message}")]
    BadArgument { call: usize, message: String },
    #[error("bar() call {call}: categories differ from the first call")]
    CategoryMismatch { call: usize },
    #[error("Unbalanced parentheses in bar() call {call}")]
    Unbalanced { call: usize },
    #[error(transparent)]
    Chart(#[from] ChartError),
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Number(f64),
    Text(String),
    List(Vec<Literal>),
}

impl Literal {
    fn parse(expr: &str) -> Option<Literal> {
        let expr = expr.trim();
        if let Some(inner) = expr.strip_prefix('[').and_then(|e| e.strip_suffix(']')) {
            return split_top_level(inner)
                .into_iter()
                .filter(|item| !item.trim().is_empty())
                .map(Literal::parse)
                .collect::<Option<Vec<_>>>()
                .map(Literal::List);
        }
        for quote in ['\'', '"'] {
            if let Some(inner) = expr.strip_prefix(quote).and_then(|e| e.strip_suffix(quote)) {
                return Some(Literal::Text(inner.to_string()));
            }
        }
        expr.parse::<f64>().ok().map(Literal::Number)
    }

    fn as_numbers(&self) -> Option<Vec<f64>> {
        match self {
            Literal::List(items) => items
                .iter()
                .map(|item| match item {
                    Literal::Number(n) => Some(*n),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    fn as_labels(&self) -> Option<Vec<String>> {
        match self {
            Literal::List(items) => items
                .iter()
                .map(|item| match item {
                    Literal::Text(s) => Some(s.clone()),
                    Literal::Number(n) => Some(format_number(*n)),
                    Literal::List(_) => None,
                })
                .collect(),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Arguments of one `bar(...)` call.
#[derive(Debug, Default)]
struct BarCall<'a> {
    positional: Vec<&'a str>,
    keywords: HashMap<&'a str, &'a str>,
}

impl<'a> BarCall<'a> {
    fn parse(args: &'a str) -> Self {
        let mut call = BarCall::default();
        for arg in split_top_level(args) {
            let arg = arg.trim();
            if arg.is_empty() {
                continue;
            }
            match keyword_split(arg) {
                Some((key, value)) => {
                    call.keywords.insert(key, value);
                }
                None => call.positional.push(arg),
            }
        }
        call
    }

    /// matplotlib's `bar(x, height, width=0.8, bottom=None, ...)`
    fn arg(&self, position: usize, name: &str) -> Option<&'a str> {
        self.keywords
            .get(name)
            .copied()
            .or_else(|| self.positional.get(position).copied())
    }
}

/// `name=value` at the top level of an argument, ignoring `==`.
fn keyword_split(arg: &str) -> Option<(&str, &str)> {
    let idx = arg.find('=')?;
    let (key, rest) = (arg[..idx].trim(), &arg[idx + 1..]);
    if rest.starts_with('=') || key.is_empty() {
        return None;
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, rest.trim()))
}

/// Split on commas outside brackets and quotes.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth -= 1,
            (None, ',') if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Drop `#` comments (also the escaped `\#` form) outside string literals.
fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut quote: Option<char> = None;
    let mut in_comment = false;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(c);
            }
            continue;
        }
        match quote {
            Some(q) => {
                out.push(c);
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if c == q || c == '\n' {
                    quote = None;
                }
            }
            None => match c {
                '#' => in_comment = true,
                '\\' if chars.peek() == Some(&'#') => {
                    chars.next();
                    in_comment = true;
                }
                '\'' | '"' => {
                    quote = Some(c);
                    out.push(c);
                }
                _ => out.push(c),
            },
        }
    }
    out
}

/// Bracket depth at every byte of `src`, ignoring brackets inside quotes.
fn depth_map(src: &str) -> Vec<i32> {
    let mut depths = vec![0; src.len() + 1];
    let mut depth = 0;
    let mut quote: Option<char> = None;
    for (i, c) in src.char_indices() {
        depths[i] = depth;
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth -= 1,
            _ => {}
        }
    }
    depths[src.len()] = depth;
    depths
}

fn is_statement_level(src: &str, depths: &[i32], start: usize) -> bool {
    depths[start] == 0 && !src[..start].ends_with('.')
}

/// Literal assignments by name; a later assignment replaces an earlier one.
fn collect_literals(src: &str) -> HashMap<String, Literal> {
    let depths = depth_map(src);
    let mut found: Vec<(usize, String, Literal)> = Vec::new();

    for cap in NUMBER_ASSIGN.captures_iter(src) {
        let name = cap
            .get(1)
            .filter(|m| is_statement_level(src, &depths, m.start()));
        if let (Some(name), Ok(value)) = (name, cap[2].parse::<f64>()) {
            found.push((name.start(), name.as_str().to_string(), Literal::Number(value)));
        }
    }
    for cap in LIST_ASSIGN.captures_iter(src) {
        let Some(name) = cap.get(1).filter(|m| is_statement_level(src, &depths, m.start())) else {
            continue;
        };
        if let Some(list) = Literal::parse(&cap[2]) {
            found.push((name.start(), name.as_str().to_string(), list));
        }
    }
    found.sort_by_key(|(start, _, _)| *start);

    let vars: HashMap<String, Literal> = found
        .into_iter()
        .map(|(_, name, lit)| (name, lit))
        .collect();
    tracing::debug!("Chart cell literals: {:?}", vars.keys().collect::<Vec<_>>());
    vars
}

/// Argument lists of every `.bar(` call, with balanced parentheses.
fn bar_calls(src: &str) -> Result<Vec<&str>, ScriptError> {
    let mut calls = Vec::new();
    for (n, (idx, _)) in src.match_indices(BAR_CALL).enumerate() {
        let open = idx + BAR_CALL.len();
        let mut depth = 1;
        let mut quote: Option<char> = None;
        let mut close = None;
        for (i, c) in src[open..].char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or(ScriptError::Unbalanced { call: n + 1 })?;
        calls.push(&src[open..close]);
    }
    Ok(calls)
}

fn resolve(expr: &str, vars: &HashMap<String, Literal>) -> Result<Literal, ScriptError> {
    if let Some(lit) = Literal::parse(expr) {
        return Ok(lit);
    }
    let name = expr.trim();
    vars.get(name)
        .cloned()
        .ok_or_else(|| ScriptError::UnknownName(name.to_string()))
}

fn numbers(
    expr: &str,
    vars: &HashMap<String, Literal>,
    call: usize,
    what: &str,
) -> Result<Vec<f64>, ScriptError> {
    resolve(expr, vars)?
        .as_numbers()
        .ok_or_else(|| ScriptError::BadArgument {
            call,
            message: format!("{} must be a list of numbers", what),
        })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True if the cell calls `.bar(` outside of comments.
pub fn has_bar_calls(source: &str) -> bool {
    strip_comments(source).contains(BAR_CALL)
}

/// Build the chart described by a plotting cell.
pub fn extract_chart(source: &str) -> Result<StackedBarChart, ScriptError> {
    let src = strip_comments(source);
    let calls = bar_calls(&src)?;
    if calls.is_empty() {
        return Err(ScriptError::NoBarCalls);
    }
    let vars = collect_literals(&src);

    let mut chart: Option<StackedBarChart> = None;
    for (n, args) in calls.iter().enumerate() {
        let call_no = n + 1;
        let call = BarCall::parse(args);

        let x = call.arg(0, "x").ok_or(ScriptError::MissingArgument {
            call: call_no,
            name: "x",
        })?;
        let categories = resolve(x, &vars)?
            .as_labels()
            .ok_or_else(|| ScriptError::BadArgument {
                call: call_no,
                message: "x must be a list of labels".into(),
            })?;
        let height = call.arg(1, "height").ok_or(ScriptError::MissingArgument {
            call: call_no,
            name: "height",
        })?;
        let values = numbers(height, &vars, call_no, "height")?;

        let width = match call.arg(2, "width") {
            Some(expr) => match resolve(expr, &vars)? {
                Literal::Number(w) => w,
                _ => {
                    return Err(ScriptError::BadArgument {
                        call: call_no,
                        message: "only a scalar width is supported".into(),
                    })
                }
            },
            None => DEFAULT_BAR_WIDTH,
        };

        let label = match call.keywords.get("label") {
            Some(expr) => match resolve(expr, &vars)? {
                Literal::Text(s) => s,
                Literal::Number(n) => format_number(n),
                Literal::List(_) => {
                    return Err(ScriptError::BadArgument {
                        call: call_no,
                        message: "label must be a string".into(),
                    })
                }
            },
            None => String::new(),
        };

        let mut series = BarSeries::new(label, values);
        if let Some(expr) = call.keywords.get("yerr") {
            series = series.with_errors(numbers(expr, &vars, call_no, "yerr")?);
        }
        if let Some(expr) = call.arg(3, "bottom") {
            series = series.with_bottom(numbers(expr, &vars, call_no, "bottom")?);
        }

        if let Some(existing) = &chart {
            if existing.categories != categories {
                return Err(ScriptError::CategoryMismatch { call: call_no });
            }
            if (existing.bar_width - width).abs() > f64::EPSILON {
                tracing::warn!(
                    "bar() call {} uses width {}, keeping {}",
                    call_no,
                    width,
                    existing.bar_width
                );
            }
        }
        let target =
            chart.get_or_insert_with(|| StackedBarChart::new(categories).bar_width(width));
        target.push_series(series)?;
    }

    let mut chart = chart.ok_or(ScriptError::NoBarCalls)?;
    for cap in TEXT_SETTER.captures_iter(&src) {
        let text = cap.get(2).or_else(|| cap.get(3)).map(|m| collapse_whitespace(m.as_str()));
        match (&cap[1], text) {
            ("ylabel", Some(t)) => chart.y_label = Some(t),
            ("xlabel", Some(t)) => chart.x_label = Some(t),
            ("title", Some(t)) => chart.title = Some(t),
            _ => {}
        }
    }
    chart.show_legend = src.contains(".legend(");
    chart.validate()?;
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GroupedScores;

    /// The plotting cell as it appears in the demo deck, line breaks and all.
    const DEMO_CELL: &str = r#"
labels = ['G1', 'G2', 'G3', 'G4', 'G6'] men_means = [20, 35, 30, 35, 27]
women_means = [25, 32, 34, 20, 25] men_std = [2, 3, 4, 1, 2] women_std =
[3, 5, 2, 3, 3] width = 0.35 \# the width of the bars: can also be
len(x) sequence

fig, ax = plt.subplots()

ax.bar(labels, men_means, width, yerr=men_std, label='Men')
ax.bar(labels, women_means, width, yerr=women_std, bottom=men_means,
label='Women')

ax.set_ylabel('Scores') ax.set_title('Scores broken out by group and
gender') ax.legend() plt.show() \`\`\`
"#;

    #[test]
    fn test_demo_cell_matches_builtin_scores() {
        let chart = extract_chart(DEMO_CELL).unwrap();
        assert_eq!(chart, GroupedScores::default().to_chart().unwrap());
    }

    #[test]
    fn test_inline_literals_and_keywords() {
        let chart = extract_chart(
            "ax.bar(x=['a', 'b'], height=[1, 2.5], width=0.5, label=\"one\")\n# ax.legend()\n",
        )
        .unwrap();
        assert_eq!(chart.categories, vec!["a", "b"]);
        assert_eq!(chart.series[0].values, vec![1.0, 2.5]);
        assert_eq!(chart.bar_width, 0.5);
        assert!(!chart.show_legend, "commented-out legend must not count");
        assert!(chart.title.is_none());
    }

    #[test]
    fn test_numeric_categories_and_default_width() {
        let chart = extract_chart("years = [2020, 2021]\nax.bar(years, [3, 4])").unwrap();
        assert_eq!(chart.categories, vec!["2020", "2021"]);
        assert_eq!(chart.bar_width, DEFAULT_BAR_WIDTH);
    }

    #[test]
    fn test_errors() {
        assert_eq!(extract_chart("plt.plot([1, 2])"), Err(ScriptError::NoBarCalls));
        assert_eq!(
            extract_chart("ax.bar(labels, [1])"),
            Err(ScriptError::UnknownName("labels".into()))
        );
        assert_eq!(
            extract_chart("ax.bar(['a'], [1]\n"),
            Err(ScriptError::Unbalanced { call: 1 })
        );
        assert_eq!(
            extract_chart("ax.bar(['a'], [1])\nax.bar(['b'], [2])"),
            Err(ScriptError::CategoryMismatch { call: 2 })
        );
        assert!(matches!(
            extract_chart("ax.bar(['a', 'b'], [1], yerr=[1, 1])"),
            Err(ScriptError::Chart(ChartError::LengthMismatch { .. }))
        ));
        assert!(matches!(
            extract_chart("ax.bar(['a'], ['x'])"),
            Err(ScriptError::BadArgument { call: 1, .. })
        ));
    }

    #[test]
    fn test_strip_comments_keeps_hashes_in_strings() {
        let out = strip_comments("a = '#1' # note\nb = 2 \\# escaped\nc = 3");
        assert_eq!(out, "a = '#1' \nb = 2 \nc = 3");
    }

    #[test]
    fn test_keyword_arguments_inside_calls_are_not_assignments() {
        let vars = collect_literals("ax.bar(x, h, bottom=[1, 2])\nbase = [0, 0]");
        assert!(vars.contains_key("base"));
        assert!(!vars.contains_key("bottom"));
    }

    #[test]
    fn test_leading_dot_width_and_last_assignment_wins() {
        let chart = extract_chart("w = [1]\nw = .5\nax.bar(['a'], [1], width=w)").unwrap();
        assert_eq!(chart.bar_width, 0.5);

        let chart = extract_chart("h = 2\nh = [4, 5]\nax.bar(['a', 'b'], h)").unwrap();
        assert_eq!(chart.series[0].values, vec![4.0, 5.0]);
    }

    #[test]
    fn test_positional_bottom() {
        let chart = extract_chart(
            "base = [1, 2]\nax.bar(['a', 'b'], [3, 4], 0.4, base, label='top')",
        )
        .unwrap();
        let series = &chart.series[0];
        assert_eq!(series.bottom.as_deref(), Some(&[1.0, 2.0][..]));
        assert_eq!(series.top(1), 6.0);
        assert_eq!(series.label, "top");
    }

    #[test]
    fn test_has_bar_calls_ignores_comments() {
        assert!(has_bar_calls("ax.bar(x, y)"));
        assert!(!has_bar_calls("# old: ax.bar(x, y)\nprint(1)"));
        assert!(!has_bar_calls("print(1) \\# ax.bar(x, y)"));
    }
}
