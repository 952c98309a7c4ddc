//! Notebook header: the commented `# ---` block at the top of a percent notebook.
//!
//! The uncommented block is YAML; it is deserialized into [`NotebookMetadata`].

use crate::notebook::NotebookError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const FENCE: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default)]
    pub title: Option<String>,
    /// `false`, or execution options such as `echo: false`
    #[serde(default)]
    pub execute: Option<Value>,
    /// Output targets: a single name, a list of names, or name -> options
    #[serde(default)]
    pub format: Option<Value>,
    #[serde(default)]
    pub knit: Option<String>,
    #[serde(default)]
    pub editor_options: Option<Value>,
    #[serde(default)]
    pub jupyter: Option<JupyterMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JupyterMetadata {
    #[serde(default)]
    pub jupytext: Option<JupytextMetadata>,
    #[serde(default)]
    pub kernelspec: Option<KernelSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JupytextMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub formats: Option<String>,
    #[serde(default)]
    pub text_representation: Option<TextRepresentation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRepresentation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub extension: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub format_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub format_version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub jupytext_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One declared output target and its options, e.g. `beamer` + `keep-tex: true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTarget {
    pub name: String,
    pub options: Map<String, Value>,
}

impl NotebookMetadata {
    /// Parse the uncommented header text. An empty header gives the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, NotebookError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(text).map_err(NotebookError::Yaml)
    }

    /// Output targets in declaration order.
    pub fn output_targets(&self) -> Vec<OutputTarget> {
        let target = |name: &str, options: Map<String, Value>| OutputTarget {
            name: name.to_string(),
            options,
        };
        match &self.format {
            Some(Value::String(name)) => vec![target(name, Map::new())],
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .map(|name| target(name, Map::new()))
                .collect(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, opts)| target(name, opts.as_object().cloned().unwrap_or_default()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn kernel_name(&self) -> Option<&str> {
        self.jupyter
            .as_ref()?
            .kernelspec
            .as_ref()?
            .name
            .as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.jupyter
            .as_ref()?
            .kernelspec
            .as_ref()?
            .language
            .as_deref()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {}",
            other
        ))),
    }
}

/// Locate the header block. Returns the uncommented header lines (with their
/// 1-based line numbers) and the index of the first line after the block.
pub fn split_header<'a>(
    lines: &[&'a str],
) -> Result<(Vec<(usize, &'a str)>, usize), NotebookError> {
    let Some(open) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Ok((Vec::new(), 0));
    };
    if uncomment(lines[open]).map(str::trim_end) != Some(FENCE) {
        return Ok((Vec::new(), 0));
    }

    let mut body = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(open + 1) {
        let Some(text) = uncomment(line) else {
            return Err(NotebookError::Header {
                line: idx + 1,
                message: "header lines must be commented".into(),
            });
        };
        if text.trim_end() == FENCE {
            return Ok((body, idx + 1));
        }
        body.push((idx + 1, text));
    }
    Err(NotebookError::UnterminatedHeader)
}

/// Strip the `# ` comment prefix. `None` if the line is not a comment.
pub fn uncomment(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_mappings_and_scalars() {
        let meta = NotebookMetadata::from_yaml(
            "title: \"MPL slides\"\nexecute: false\nformat:\n  pdf: default\n  beamer: \n    keep-tex: true\neditor_options: \n  markdown: \n    wrap: 72\n",
        )
        .unwrap();
        assert_eq!(meta.title.as_deref(), Some("MPL slides"));
        assert_eq!(meta.execute, Some(json!(false)));
        assert_eq!(
            meta.format,
            Some(json!({"pdf": "default", "beamer": {"keep-tex": true}}))
        );
        assert_eq!(meta.editor_options, Some(json!({"markdown": {"wrap": 72}})));
    }

    #[test]
    fn test_execute_options_mapping() {
        let meta = NotebookMetadata::from_yaml("execute:\n  echo: false\n").unwrap();
        assert_eq!(meta.execute, Some(json!({"echo": false})));
    }

    #[test]
    fn test_flow_mapping_targets() {
        let meta =
            NotebookMetadata::from_yaml("format: {pdf: default, beamer: {keep-tex: true}}\n")
                .unwrap();
        let targets = meta.output_targets();
        let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["pdf", "beamer"]);
        assert_eq!(targets[1].options["keep-tex"], json!(true));
    }

    #[test]
    fn test_versions_and_unknown_keys() {
        let meta = NotebookMetadata::from_yaml(
            "subtitle: Q3\ntags: [\"a, b\", c]\njupyter:\n  jupytext:\n    formats: ipynb,md,py:percent\n    text_representation:\n      format_version: 1.3\n      jupytext_version: 1.6.0\n",
        )
        .unwrap();
        assert_eq!(meta.extra["subtitle"], json!("Q3"));
        assert_eq!(meta.extra["tags"], json!(["a, b", "c"]));
        let jupytext = meta.jupyter.unwrap().jupytext.unwrap();
        assert_eq!(jupytext.formats.as_deref(), Some("ipynb,md,py:percent"));
        let rep = jupytext.text_representation.unwrap();
        assert_eq!(rep.format_version.as_deref(), Some("1.3"));
        assert_eq!(rep.jupytext_version.as_deref(), Some("1.6.0"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let err = NotebookMetadata::from_yaml("title: [unclosed\n").unwrap_err();
        assert!(matches!(err, NotebookError::Yaml(_)));
        assert_eq!(NotebookMetadata::from_yaml("\n").unwrap(), NotebookMetadata::default());
    }

    #[test]
    fn test_split_header_requires_closing_fence() {
        let lines = vec!["# ---", "# title: x"];
        assert!(matches!(
            split_header(&lines),
            Err(NotebookError::UnterminatedHeader)
        ));

        let lines = vec!["", "# ---", "# title: x", "# ---", "print(1)"];
        let (body, next) = split_header(&lines).unwrap();
        assert_eq!(body, vec![(3, "title: x")]);
        assert_eq!(next, 4);
    }

    #[test]
    fn test_uncommented_header_line_reports_position() {
        let lines = vec!["# ---", "# title: x", "title: y", "# ---"];
        assert!(matches!(
            split_header(&lines),
            Err(NotebookError::Header { line: 3, .. })
        ));
    }

    #[test]
    fn test_no_header() {
        let lines = vec!["x = 1"];
        assert_eq!(split_header(&lines).unwrap(), (Vec::new(), 0));
    }

    #[test]
    fn test_output_targets_keep_declaration_order() {
        let meta = NotebookMetadata::from_yaml(
            "format:\n  pdf: default\n  beamer:\n    keep-tex: true\n  revealjs:\n    template: revealjs.template\n",
        )
        .unwrap();
        let targets = meta.output_targets();
        let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["pdf", "beamer", "revealjs"]);
        assert!(targets[0].options.is_empty());
        assert_eq!(targets[1].options["keep-tex"], json!(true));

        let single = NotebookMetadata::from_yaml("format: revealjs").unwrap();
        assert_eq!(single.output_targets()[0].name, "revealjs");
        let listed = NotebookMetadata::from_yaml("format: [pdf, html]").unwrap();
        assert_eq!(listed.output_targets().len(), 2);
    }
}
