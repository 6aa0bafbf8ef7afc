//! Route templates.
//!
//! Routes may be written `/users/{id}`, `/users/:id` or, with a constraint,
//! `/users/{id:[0-9]+}`. Every form is normalized to `/users/{id}`, which is
//! both the Swagger path template and the axum route syntax. Constraints are
//! kept as anchored regexes and checked against live path parameters.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PathTemplate {
    path: String,
    parameters: Vec<PathParameter>,
}

#[derive(Debug, Clone)]
struct PathParameter {
    name: String,
    pattern: Option<Regex>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidRouteTemplate {
            path: template.to_string(),
            message,
        };

        if !template.starts_with('/') {
            return Err(invalid("must start with '/'".to_string()));
        }

        let mut parameters: Vec<PathParameter> = Vec::new();
        let mut segments = Vec::new();
        for segment in template.split('/') {
            if let Some(name) = segment.strip_prefix(':') {
                parameters.push(parameter(name, None).map_err(&invalid)?);
                segments.push(format!("{{{}}}", name));
                continue;
            }

            let mut out = String::new();
            let mut rest = segment;
            while let Some(start) = rest.find(|c: char| c == '{' || c == '}') {
                if rest[start..].starts_with('}') {
                    return Err(invalid("unbalanced '}'".to_string()));
                }
                out.push_str(&rest[..start]);

                // quantifiers like `{3}` nest inside a constraint
                let mut depth = 0;
                let mut end = None;
                for (i, c) in rest[start..].char_indices() {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                end = Some(start + i);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let end = end.ok_or_else(|| invalid("unclosed '{'".to_string()))?;

                let inner = &rest[start + 1..end];
                let (name, pattern) = match inner.split_once(':') {
                    Some((name, pattern)) => (name, Some(pattern)),
                    None => (inner, None),
                };
                parameters.push(parameter(name, pattern).map_err(&invalid)?);
                out.push('{');
                out.push_str(name);
                out.push('}');
                rest = &rest[end + 1..];
            }
            out.push_str(rest);
            segments.push(out);
        }

        for (i, param) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(invalid(format!("duplicate parameter '{}'", param.name)));
            }
        }

        Ok(Self {
            path: segments.join("/"),
            parameters,
        })
    }

    /// Normalized template, e.g. `/users/{id}`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Whether matched path parameters satisfy every constraint
    pub fn accepts(&self, values: &HashMap<String, String>) -> bool {
        self.parameters.iter().all(|param| match &param.pattern {
            Some(pattern) => values
                .get(&param.name)
                .is_some_and(|value| pattern.is_match(value)),
            None => true,
        })
    }
}

fn parameter(name: &str, pattern: Option<&str>) -> std::result::Result<PathParameter, String> {
    if name.is_empty() {
        return Err("empty parameter name".to_string());
    }
    if name.contains(|c: char| c == '{' || c == '}' || c == '*') {
        return Err(format!("invalid parameter name '{}'", name));
    }
    let pattern = match pattern {
        Some("") => return Err(format!("empty pattern for '{}'", name)),
        Some(pattern) => Some(
            Regex::new(&format!("^(?:{})$", pattern))
                .map_err(|e| format!("invalid pattern for '{}': {}", name, e))?,
        ),
        None => None,
    };
    Ok(PathParameter {
        name: name.to_string(),
        pattern,
    })
}

/// Turn a route template into a Swagger path template.
///
/// `:name` segments become `{name}` and `{name:pattern}` drops its pattern.
pub fn convert_path_template(path: &str) -> Result<String> {
    PathTemplate::parse(path).map(|template| template.path)
}
